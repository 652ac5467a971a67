//! `pnt menu` command - the interactive menu loop
//!
//! Drives a single in-memory [`RecordStore`] through the full action set of
//! the tool. Every error here is recovered locally and shown as a styled
//! message; only prompt I/O failures end the session.

use std::fs;
use std::path::Path;

use console::style;
use miette::Result;

use crate::cli::{output, prompts};
use crate::core::audit::AuditLog;
use crate::core::codec;
use crate::core::store::{
    Cmp, PipeFilter, PipeUpdate, RecordKind, RecordStore, StationFilter, StationUpdate,
    WorkshopChange,
};

const ACTIONS: &[&str] = &[
    "Add a pipe",
    "Add a station",
    "Add several pipes",
    "Add several stations",
    "View everything",
    "Edit a pipe",
    "Edit a station",
    "Delete a pipe",
    "Delete a station",
    "Delete several pipes",
    "Delete several stations",
    "Search pipes",
    "Search stations",
    "Save data",
    "Load data",
    "Exit",
];

pub fn run(audit: &mut AuditLog) -> Result<()> {
    let mut store = RecordStore::new();
    audit.session_started();
    audit.record("program started", "");
    println!("{}", style("Pipeline inventory management").bold());

    loop {
        println!();
        let choice = prompts::choose("Choose an action", ACTIONS)?;
        audit.record("menu selection", ACTIONS[choice]);

        match choice {
            0 => add_pipe(&mut store, audit)?,
            1 => add_station(&mut store, audit)?,
            2 => add_many(&mut store, audit, RecordKind::Pipe)?,
            3 => add_many(&mut store, audit, RecordKind::Station)?,
            4 => view_all(&store),
            5 => edit_pipe(&mut store, audit)?,
            6 => edit_station(&mut store, audit)?,
            // Single and bulk delete share the same selection flow
            7 | 9 => delete_records(&mut store, audit, RecordKind::Pipe)?,
            8 | 10 => delete_records(&mut store, audit, RecordKind::Station)?,
            11 => search_pipes(&store, audit)?,
            12 => search_stations(&store, audit)?,
            13 => save_data(&store, audit)?,
            14 => load_data(&mut store, audit)?,
            _ => {
                println!("Leaving the program.");
                audit.record("program exit", "");
                break;
            }
        }
    }

    audit.session_ended();
    Ok(())
}

fn add_pipe(store: &mut RecordStore, audit: &mut AuditLog) -> Result<()> {
    let name = prompts::name("Pipe name")?;
    let length = prompts::positive_f64("Length (km)")?;
    let diameter = prompts::bounded_u32("Diameter (mm)", 1, u32::MAX)?;

    match store.add_pipe(&name, length, diameter) {
        Ok(id) => {
            output::success(&format!("Pipe '{name}' added with ID {id}"));
            audit.record("pipe added", &format!("ID: {id}, name: {name}"));
        }
        Err(err) => println!("{}", style(err).red()),
    }
    Ok(())
}

fn add_station(store: &mut RecordStore, audit: &mut AuditLog) -> Result<()> {
    let name = prompts::name("Station name")?;
    let total = prompts::bounded_u32("Workshop count", 1, u32::MAX)?;
    let active = prompts::bounded_u32("Workshops running now", 0, total)?;
    let class = prompts::bounded_u32("Station class", 1, u32::MAX)?;

    match store.add_station(&name, total, active, class) {
        Ok(id) => {
            output::success(&format!("Station '{name}' added with ID {id}"));
            audit.record("station added", &format!("ID: {id}, name: {name}"));
        }
        Err(err) => println!("{}", style(err).red()),
    }
    Ok(())
}

fn add_many(store: &mut RecordStore, audit: &mut AuditLog, kind: RecordKind) -> Result<()> {
    let count = prompts::bounded_u32("How many to add", 1, 100)?;
    for i in 1..=count {
        println!("\nAdding {kind} {i} of {count}");
        match kind {
            RecordKind::Pipe => add_pipe(store, audit)?,
            RecordKind::Station => add_station(store, audit)?,
        }
    }
    let total = match kind {
        RecordKind::Pipe => store.pipes().len(),
        RecordKind::Station => store.stations().len(),
    };
    println!("Added {count} {kind}(s), {total} in total");
    Ok(())
}

fn view_all(store: &RecordStore) {
    let pipes: Vec<_> = store.pipes().iter().collect();
    let stations: Vec<_> = store.stations().iter().collect();
    output::print_pipes(&pipes);
    output::print_stations(&stations);
}

fn edit_pipe(store: &mut RecordStore, audit: &mut AuditLog) -> Result<()> {
    if store.pipes().is_empty() {
        output::info("No pipes available");
        return Ok(());
    }
    let pipes: Vec<_> = store.pipes().iter().collect();
    output::print_pipes(&pipes);

    let id = prompts::bounded_u32("Pipe ID to edit", 1, u32::MAX)?;
    if store.pipe(id).is_none() {
        println!("{}", style(format!("No pipe with ID {id}")).red());
        return Ok(());
    }

    let action = prompts::choose(
        "What to change",
        &["Toggle repair status", "Overwrite the fields"],
    )?;
    if action == 0 {
        // Lookup was checked above, so the toggle cannot miss
        if let Ok(under_repair) = store.toggle_repair(id) {
            let label = if under_repair { "under repair" } else { "in service" };
            output::success(&format!("Pipe {id} is now {label}"));
            audit.record(
                "pipe repair status changed",
                &format!("ID: {id}, status: {label}"),
            );
        }
    } else {
        let name = prompts::name("New name")?;
        let length = prompts::positive_f64("New length (km)")?;
        let diameter = prompts::bounded_u32("New diameter (mm)", 1, u32::MAX)?;
        match store.update_pipe(
            id,
            PipeUpdate {
                name: Some(name.clone()),
                length_km: Some(length),
                diameter_mm: Some(diameter),
            },
        ) {
            Ok(()) => {
                output::success(&format!("Pipe {id} updated"));
                audit.record("pipe updated", &format!("ID: {id}, name: {name}"));
            }
            Err(err) => println!("{}", style(err).red()),
        }
    }
    Ok(())
}

fn edit_station(store: &mut RecordStore, audit: &mut AuditLog) -> Result<()> {
    if store.stations().is_empty() {
        output::info("No stations available");
        return Ok(());
    }
    let stations: Vec<_> = store.stations().iter().collect();
    output::print_stations(&stations);

    let id = prompts::bounded_u32("Station ID to edit", 1, u32::MAX)?;
    let Some(station) = store.station(id) else {
        println!("{}", style(format!("No station with ID {id}")).red());
        return Ok(());
    };

    let action = prompts::choose(
        "What to change",
        &["Start or stop a workshop", "Overwrite the fields"],
    )?;
    if action == 0 {
        println!(
            "Current state: {}/{} workshops running",
            station.active_workshops, station.total_workshops
        );
        let direction = prompts::choose("Workshop action", &["Start one", "Stop one"])?;
        let change = if direction == 0 {
            store.start_workshop(id)
        } else {
            store.stop_workshop(id)
        };
        match change {
            Ok(WorkshopChange::Changed(active)) => {
                let verb = if direction == 0 { "started" } else { "stopped" };
                output::success(&format!("Workshop {verb}, {active} running"));
                audit.record(
                    if direction == 0 {
                        "workshop started"
                    } else {
                        "workshop stopped"
                    },
                    &format!("station ID: {id}, running: {active}"),
                );
            }
            Ok(WorkshopChange::AtCapacity) => {
                output::info("All workshops are already running, nothing to start");
            }
            Ok(WorkshopChange::AllStopped) => {
                output::info("No workshops are running, nothing to stop");
            }
            Err(err) => println!("{}", style(err).red()),
        }
    } else {
        let name = prompts::name("New name")?;
        let total = prompts::bounded_u32("New workshop count", 1, u32::MAX)?;
        let class = prompts::bounded_u32("New station class", 1, u32::MAX)?;
        match store.update_station(
            id,
            StationUpdate {
                name: Some(name.clone()),
                total_workshops: Some(total),
                station_class: Some(class),
            },
        ) {
            Ok(()) => {
                output::success(&format!("Station {id} updated"));
                audit.record("station updated", &format!("ID: {id}, name: {name}"));
            }
            Err(err) => println!("{}", style(err).red()),
        }
    }
    Ok(())
}

fn delete_records(store: &mut RecordStore, audit: &mut AuditLog, kind: RecordKind) -> Result<()> {
    let empty = match kind {
        RecordKind::Pipe => store.pipes().is_empty(),
        RecordKind::Station => store.stations().is_empty(),
    };
    if empty {
        output::info(&format!("No {kind}s available"));
        return Ok(());
    }
    view_all(store);

    let raw = prompts::id_list(&format!("Select {kind}s to delete"))?;
    let selection = store.select_ids(&raw, kind);
    output::print_selection_warnings(&selection);
    if selection.ids.is_empty() {
        output::info(&format!("No matching {kind}s to delete"));
        return Ok(());
    }

    match kind {
        RecordKind::Pipe => {
            let removed = store.delete_pipes(&selection.ids);
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
        }
        RecordKind::Station => {
            let removed = store.delete_stations(&selection.ids);
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
        }
    }
    Ok(())
}

fn search_pipes(store: &RecordStore, audit: &mut AuditLog) -> Result<()> {
    if store.pipes().is_empty() {
        output::info("No pipes available to search");
        return Ok(());
    }

    let kind = prompts::choose("Search by", &["Name", "Repair status"])?;
    let (filter, details) = if kind == 0 {
        let needle = prompts::name("Name to search for")?;
        let details = format!("name contains '{needle}'");
        (PipeFilter::NameContains(needle), details)
    } else {
        let status = prompts::choose("Which pipes", &["Under repair", "In service"])?;
        let under_repair = status == 0;
        (
            PipeFilter::UnderRepair(under_repair),
            format!("under repair: {under_repair}"),
        )
    };

    let results = store.search_pipes(&filter);
    output::print_pipes(&results);
    audit.record(
        "pipe search",
        &format!("{details}, found: {}", results.len()),
    );
    Ok(())
}

fn search_stations(store: &RecordStore, audit: &mut AuditLog) -> Result<()> {
    if store.stations().is_empty() {
        output::info("No stations available to search");
        return Ok(());
    }

    let kind = prompts::choose("Search by", &["Name", "Idle workshop percentage"])?;
    let (filter, details) = if kind == 0 {
        let needle = prompts::name("Name to search for")?;
        let details = format!("name contains '{needle}'");
        (StationFilter::NameContains(needle), details)
    } else {
        let cmp = match prompts::choose(
            "Comparison",
            &["Greater than", "Less than", "Equal to"],
        )? {
            0 => Cmp::Greater,
            1 => Cmp::Less,
            _ => Cmp::Equal,
        };
        let target = prompts::bounded_f64("Idle percentage (0-100)", 0.0, 100.0)?;
        (
            StationFilter::InactivePercent { cmp, target },
            format!("idle percentage vs {target}"),
        )
    };

    let results = store.search_stations(&filter);
    output::print_stations(&results);
    audit.record(
        "station search",
        &format!("{details}, found: {}", results.len()),
    );
    Ok(())
}

fn save_data(store: &RecordStore, audit: &mut AuditLog) -> Result<()> {
    let filename = prompts::name("File name to save to")?;
    match codec::save_to_file(store, &filename) {
        Ok(written) => {
            let shown = fs::canonicalize(&written).unwrap_or(written);
            output::success(&format!("Data saved to {}", shown.display()));
            audit.record(
                "data saved",
                &format!(
                    "file: {filename}, pipes: {}, stations: {}",
                    store.pipes().len(),
                    store.stations().len()
                ),
            );
        }
        // An unwritable target aborts this one operation only
        Err(err) => println!("{}", style(format!("Cannot save: {err}")).red()),
    }
    Ok(())
}

fn load_data(store: &mut RecordStore, audit: &mut AuditLog) -> Result<()> {
    let filename = prompts::name("File name to load from")?;
    match codec::load_from_file(Path::new(&filename)) {
        Ok(loaded) => {
            // A successful decode fully replaces the in-memory state
            *store = loaded;
            output::success(&format!(
                "Loaded {} pipe(s) and {} station(s)",
                store.pipes().len(),
                store.stations().len()
            ));
            audit.record(
                "data loaded",
                &format!(
                    "file: {filename}, pipes: {}, stations: {}",
                    store.pipes().len(),
                    store.stations().len()
                ),
            );
        }
        // A failed load leaves the current inventory untouched
        Err(err) => println!("{}", style(format!("Cannot load: {err}")).red()),
    }
    Ok(())
}
