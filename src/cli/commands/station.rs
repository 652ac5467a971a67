//! `pnt station` command - compressor station management

use clap::{ArgGroup, Args, Subcommand};
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::{load_store, persist_store};
use crate::cli::output;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::audit::AuditLog;
use crate::core::store::{Cmp, RecordKind, StationFilter, StationUpdate, WorkshopChange};

#[derive(Subcommand, Debug)]
pub enum StationCommands {
    /// Add a compressor station
    New(NewArgs),

    /// List all compressor stations
    List(ListArgs),

    /// Overwrite a station's fields
    Edit(EditArgs),

    /// Bring one more workshop online
    Start(WorkshopArgs),

    /// Take one workshop offline
    Stop(WorkshopArgs),

    /// Delete stations by ID list, or all of them
    Delete(DeleteArgs),

    /// Search stations by name or idle workshop percentage
    Search(SearchArgs),
}

#[derive(Args, Debug)]
pub struct NewArgs {
    /// Station name
    #[arg(long)]
    pub name: String,

    /// Total workshop count, at least 1
    #[arg(long)]
    pub total: u32,

    /// Workshops running right now, at most --total
    #[arg(long, default_value_t = 0)]
    pub active: u32,

    /// Station class rating, at least 1
    #[arg(long)]
    pub class: u32,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(long, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// ID of the station to edit
    pub id: u32,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New total workshop count; shrinking below the running count clamps it
    #[arg(long)]
    pub total: Option<u32>,

    /// New station class rating
    #[arg(long)]
    pub class: Option<u32>,
}

#[derive(Args, Debug)]
pub struct WorkshopArgs {
    /// ID of the station
    pub id: u32,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// IDs separated by commas, or 'all' for every station
    #[arg(value_name = "IDS")]
    pub ids: String,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("criteria").required(true).multiple(false)))]
pub struct SearchArgs {
    /// Case-insensitive substring to look for in names
    #[arg(long, group = "criteria")]
    pub name: Option<String>,

    /// Stations whose idle percentage is above this value
    #[arg(long, value_name = "PCT", group = "criteria")]
    pub idle_above: Option<f64>,

    /// Stations whose idle percentage is below this value
    #[arg(long, value_name = "PCT", group = "criteria")]
    pub idle_below: Option<f64>,

    /// Stations whose idle percentage equals this value (within 0.01)
    #[arg(long, value_name = "PCT", group = "criteria")]
    pub idle_equals: Option<f64>,

    /// Output format
    #[arg(long, default_value = "table")]
    pub format: OutputFormat,
}

pub fn run(cmd: StationCommands, global: &GlobalOpts, audit: &mut AuditLog) -> Result<()> {
    match cmd {
        StationCommands::New(args) => run_new(args, global, audit),
        StationCommands::List(args) => run_list(args, global),
        StationCommands::Edit(args) => run_edit(args, global, audit),
        StationCommands::Start(args) => run_workshop(args, true, global, audit),
        StationCommands::Stop(args) => run_workshop(args, false, global, audit),
        StationCommands::Delete(args) => run_delete(args, global, audit),
        StationCommands::Search(args) => run_search(args, global, audit),
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts, audit: &mut AuditLog) -> Result<()> {
    let mut store = load_store(global)?;
    let id = store
        .add_station(&args.name, args.total, args.active, args.class)
        .into_diagnostic()?;
    persist_store(&store, global)?;

    output::success(&format!("Station '{}' added with ID {}", args.name, id));
    audit.record("station added", &format!("ID: {id}, name: {}", args.name));
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let store = load_store(global)?;
    match args.format {
        OutputFormat::Table => {
            let stations: Vec<_> = store.stations().iter().collect();
            output::print_stations(&stations);
        }
        OutputFormat::Json => output::print_json(store.stations())?,
    }
    Ok(())
}

fn run_edit(args: EditArgs, global: &GlobalOpts, audit: &mut AuditLog) -> Result<()> {
    if args.name.is_none() && args.total.is_none() && args.class.is_none() {
        miette::bail!("nothing to change: pass --name, --total, or --class");
    }

    let mut store = load_store(global)?;
    store
        .update_station(
            args.id,
            StationUpdate {
                name: args.name.clone(),
                total_workshops: args.total,
                station_class: args.class,
            },
        )
        .into_diagnostic()?;
    persist_store(&store, global)?;

    if let Some(station) = store.station(args.id) {
        output::success(&format!(
            "Station {} updated, {}/{} workshops running",
            args.id, station.active_workshops, station.total_workshops
        ));
        audit.record(
            "station updated",
            &format!("ID: {}, name: {}", args.id, station.name),
        );
    }
    Ok(())
}

fn run_workshop(
    args: WorkshopArgs,
    start: bool,
    global: &GlobalOpts,
    audit: &mut AuditLog,
) -> Result<()> {
    let mut store = load_store(global)?;
    let change = if start {
        store.start_workshop(args.id)
    } else {
        store.stop_workshop(args.id)
    }
    .into_diagnostic()?;

    match change {
        WorkshopChange::Changed(active) => {
            persist_store(&store, global)?;
            let verb = if start { "started" } else { "stopped" };
            let total = store.station(args.id).map(|s| s.total_workshops).unwrap_or(0);
            output::success(&format!(
                "Workshop {verb}, {active}/{total} running at station {}",
                args.id
            ));
            audit.record(
                if start {
                    "workshop started"
                } else {
                    "workshop stopped"
                },
                &format!("station ID: {}, running: {active}", args.id),
            );
        }
        WorkshopChange::AtCapacity => {
            output::info("All workshops are already running, nothing to start");
        }
        WorkshopChange::AllStopped => {
            output::info("No workshops are running, nothing to stop");
        }
    }
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts, audit: &mut AuditLog) -> Result<()> {
    let mut store = load_store(global)?;
    let selection = store.select_ids(&args.ids, RecordKind::Station);
    output::print_selection_warnings(&selection);

    if selection.ids.is_empty() {
        output::info("No matching stations to delete");
        return Ok(());
    }

    let removed = store.delete_stations(&selection.ids);
    persist_store(&store, global)?;

    for station in &removed {
        println!("Deleted station: {} (ID: {})", station.name, station.id);
        audit.record(
            "station deleted",
            &format!("ID: {}, name: {}", station.id, station.name),
        );
    }
    output::success(&format!(
        "Deleted {} station(s), {} remaining",
        removed.len(),
        store.stations().len()
    ));
    Ok(())
}

fn run_search(args: SearchArgs, global: &GlobalOpts, audit: &mut AuditLog) -> Result<()> {
    let store = load_store(global)?;
    let (filter, details) = match (&args.name, args.idle_above, args.idle_below, args.idle_equals)
    {
        (Some(needle), _, _, _) => (
            StationFilter::NameContains(needle.clone()),
            format!("name contains '{needle}'"),
        ),
        (None, Some(target), _, _) => (
            StationFilter::InactivePercent {
                cmp: Cmp::Greater,
                target,
            },
            format!("idle > {target}%"),
        ),
        (None, None, Some(target), _) => (
            StationFilter::InactivePercent {
                cmp: Cmp::Less,
                target,
            },
            format!("idle < {target}%"),
        ),
        (None, None, None, Some(target)) => (
            StationFilter::InactivePercent {
                cmp: Cmp::Equal,
                target,
            },
            format!("idle == {target}%"),
        ),
        // clap's argument group guarantees one criterion is present
        (None, None, None, None) => unreachable!("clap enforces a search criterion"),
    };

    let results = store.search_stations(&filter);
    match args.format {
        OutputFormat::Table => output::print_stations(&results),
        OutputFormat::Json => output::print_json(&results)?,
    }
    println!("{} station(s) found", style(results.len()).cyan());
    audit.record(
        "station search",
        &format!("{details}, found: {}", results.len()),
    );
    Ok(())
}
