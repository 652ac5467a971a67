//! `pnt pipe` command - pipe segment management

use clap::{ArgGroup, Args, Subcommand, ValueEnum};
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::{load_store, persist_store};
use crate::cli::output;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::audit::AuditLog;
use crate::core::store::{PipeFilter, PipeUpdate, RecordKind};

#[derive(Subcommand, Debug)]
pub enum PipeCommands {
    /// Add a pipe segment
    New(NewArgs),

    /// List all pipe segments
    List(ListArgs),

    /// Overwrite a pipe's fields
    Edit(EditArgs),

    /// Toggle a pipe's repair flag
    Repair(RepairArgs),

    /// Delete pipes by ID list, or all of them
    Delete(DeleteArgs),

    /// Search pipes by name or repair status
    Search(SearchArgs),
}

/// Repair-status filter values
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RepairStatus {
    /// Pipes currently under repair
    Repair,
    /// Pipes in service
    Service,
}

#[derive(Args, Debug)]
pub struct NewArgs {
    /// Pipe name
    #[arg(long)]
    pub name: String,

    /// Length in kilometres, must be positive
    #[arg(long)]
    pub length: f64,

    /// Diameter in millimetres, must be positive
    #[arg(long)]
    pub diameter: u32,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(long, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// ID of the pipe to edit
    pub id: u32,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New length in kilometres
    #[arg(long)]
    pub length: Option<f64>,

    /// New diameter in millimetres
    #[arg(long)]
    pub diameter: Option<u32>,
}

#[derive(Args, Debug)]
pub struct RepairArgs {
    /// ID of the pipe to toggle
    pub id: u32,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// IDs separated by commas, or 'all' for every pipe
    #[arg(value_name = "IDS")]
    pub ids: String,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("criteria").required(true).multiple(false)))]
pub struct SearchArgs {
    /// Case-insensitive substring to look for in names
    #[arg(long, group = "criteria")]
    pub name: Option<String>,

    /// Match on repair status
    #[arg(long, group = "criteria")]
    pub status: Option<RepairStatus>,

    /// Output format
    #[arg(long, default_value = "table")]
    pub format: OutputFormat,
}

pub fn run(cmd: PipeCommands, global: &GlobalOpts, audit: &mut AuditLog) -> Result<()> {
    match cmd {
        PipeCommands::New(args) => run_new(args, global, audit),
        PipeCommands::List(args) => run_list(args, global),
        PipeCommands::Edit(args) => run_edit(args, global, audit),
        PipeCommands::Repair(args) => run_repair(args, global, audit),
        PipeCommands::Delete(args) => run_delete(args, global, audit),
        PipeCommands::Search(args) => run_search(args, global, audit),
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts, audit: &mut AuditLog) -> Result<()> {
    let mut store = load_store(global)?;
    let id = store
        .add_pipe(&args.name, args.length, args.diameter)
        .into_diagnostic()?;
    persist_store(&store, global)?;

    output::success(&format!("Pipe '{}' added with ID {}", args.name, id));
    audit.record("pipe added", &format!("ID: {id}, name: {}", args.name));
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let store = load_store(global)?;
    match args.format {
        OutputFormat::Table => {
            let pipes: Vec<_> = store.pipes().iter().collect();
            output::print_pipes(&pipes);
        }
        OutputFormat::Json => output::print_json(store.pipes())?,
    }
    Ok(())
}

fn run_edit(args: EditArgs, global: &GlobalOpts, audit: &mut AuditLog) -> Result<()> {
    if args.name.is_none() && args.length.is_none() && args.diameter.is_none() {
        miette::bail!("nothing to change: pass --name, --length, or --diameter");
    }

    let mut store = load_store(global)?;
    store
        .update_pipe(
            args.id,
            PipeUpdate {
                name: args.name.clone(),
                length_km: args.length,
                diameter_mm: args.diameter,
            },
        )
        .into_diagnostic()?;
    persist_store(&store, global)?;

    // After a successful update the pipe is guaranteed to exist
    if let Some(pipe) = store.pipe(args.id) {
        output::success(&format!("Pipe {} updated", args.id));
        audit.record("pipe updated", &format!("ID: {}, name: {}", args.id, pipe.name));
    }
    Ok(())
}

fn run_repair(args: RepairArgs, global: &GlobalOpts, audit: &mut AuditLog) -> Result<()> {
    let mut store = load_store(global)?;
    let under_repair = store.toggle_repair(args.id).into_diagnostic()?;
    persist_store(&store, global)?;

    let label = if under_repair { "under repair" } else { "in service" };
    output::success(&format!("Pipe {} is now {label}", args.id));
    audit.record(
        "pipe repair status changed",
        &format!("ID: {}, status: {label}", args.id),
    );
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts, audit: &mut AuditLog) -> Result<()> {
    let mut store = load_store(global)?;
    let selection = store.select_ids(&args.ids, RecordKind::Pipe);
    output::print_selection_warnings(&selection);

    if selection.ids.is_empty() {
        output::info("No matching pipes to delete");
        return Ok(());
    }

    let removed = store.delete_pipes(&selection.ids);
    persist_store(&store, global)?;

    for pipe in &removed {
        println!("Deleted pipe: {} (ID: {})", pipe.name, pipe.id);
        audit.record(
            "pipe deleted",
            &format!("ID: {}, name: {}", pipe.id, pipe.name),
        );
    }
    output::success(&format!(
        "Deleted {} pipe(s), {} remaining",
        removed.len(),
        store.pipes().len()
    ));
    Ok(())
}

fn run_search(args: SearchArgs, global: &GlobalOpts, audit: &mut AuditLog) -> Result<()> {
    let store = load_store(global)?;
    let (filter, details) = match (&args.name, args.status) {
        (Some(needle), _) => (
            PipeFilter::NameContains(needle.clone()),
            format!("name contains '{needle}'"),
        ),
        (None, Some(status)) => {
            let under_repair = matches!(status, RepairStatus::Repair);
            (
                PipeFilter::UnderRepair(under_repair),
                format!("under repair: {under_repair}"),
            )
        }
        // clap's argument group guarantees one criterion is present
        (None, None) => unreachable!("clap enforces a search criterion"),
    };

    let results = store.search_pipes(&filter);
    match args.format {
        OutputFormat::Table => output::print_pipes(&results),
        OutputFormat::Json => output::print_json(&results)?,
    }
    println!("{} pipe(s) found", style(results.len()).cyan());
    audit.record(
        "pipe search",
        &format!("{details}, found: {}", results.len()),
    );
    Ok(())
}
