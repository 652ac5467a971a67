//! `pnt data` command - snapshot save and load

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::{load_store, persist_store};
use crate::cli::output;
use crate::cli::GlobalOpts;
use crate::core::audit::AuditLog;
use crate::core::codec;

#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Save the inventory to a named snapshot file
    Save(SaveArgs),

    /// Replace the inventory with a snapshot file's contents
    Load(LoadArgs),
}

#[derive(Args, Debug)]
pub struct SaveArgs {
    /// Snapshot file name; gains a .txt extension when it has none
    #[arg(value_name = "NAME")]
    pub name: String,
}

#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Snapshot file to load
    pub path: PathBuf,
}

pub fn run(cmd: DataCommands, global: &GlobalOpts, audit: &mut AuditLog) -> Result<()> {
    match cmd {
        DataCommands::Save(args) => run_save(args, global, audit),
        DataCommands::Load(args) => run_load(args, global, audit),
    }
}

fn run_save(args: SaveArgs, global: &GlobalOpts, audit: &mut AuditLog) -> Result<()> {
    let store = load_store(global)?;
    let written = codec::save_to_file(&store, &args.name).into_diagnostic()?;
    let shown = fs::canonicalize(&written).unwrap_or(written);

    output::success(&format!(
        "Saved {} pipe(s) and {} station(s) to {}",
        store.pipes().len(),
        store.stations().len(),
        shown.display()
    ));
    audit.record(
        "data saved",
        &format!(
            "file: {}, pipes: {}, stations: {}",
            args.name,
            store.pipes().len(),
            store.stations().len()
        ),
    );
    Ok(())
}

fn run_load(args: LoadArgs, global: &GlobalOpts, audit: &mut AuditLog) -> Result<()> {
    // Decode first; on any format error the working snapshot stays untouched
    let store = codec::load_from_file(&args.path).into_diagnostic()?;
    persist_store(&store, global)?;

    output::success(&format!(
        "Loaded {} pipe(s) and {} station(s) from {}",
        store.pipes().len(),
        store.stations().len(),
        args.path.display()
    ));
    audit.record(
        "data loaded",
        &format!(
            "file: {}, pipes: {}, stations: {}",
            args.path.display(),
            store.pipes().len(),
            store.stations().len()
        ),
    );
    Ok(())
}
