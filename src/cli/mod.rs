//! CLI module - argument parsing, prompts, and command dispatch

pub mod args;
pub mod commands;
pub mod output;
pub mod prompts;

pub use args::{Cli, Commands, GlobalOpts, OutputFormat};
