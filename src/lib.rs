//! PNT: Pipenet Toolkit
//!
//! A console tool for managing a gas-transport inventory of pipe segments and
//! compressor stations, with flat-file persistence and an audit trail.

pub mod cli;
pub mod core;
