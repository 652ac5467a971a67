//! Record store - owns the pipe and station collections
//!
//! The store is an explicit value threaded through every operation; there is
//! no process-wide singleton. Both collections are insertion-ordered and IDs
//! are assigned monotonically, so ascending ID order and insertion order
//! coincide even after deletions.

use thiserror::Error;

use crate::core::pipe::Pipe;
use crate::core::station::CompressorStation;

/// Epsilon used for equality comparisons on the inactive-percent metric
pub const PERCENT_EPSILON: f64 = 0.01;

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// A field value is out of range
    #[error("{0}")]
    Validation(String),

    /// The given ID does not resolve to a record
    #[error("no {kind} with ID {id}")]
    NotFound { kind: RecordKind, id: u32 },
}

/// Which of the two record collections an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Pipe,
    Station,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Pipe => write!(f, "pipe"),
            RecordKind::Station => write!(f, "station"),
        }
    }
}

/// Outcome of a workshop start/stop request.
///
/// Hitting a boundary is informational, not an error: the store reports the
/// condition and leaves the station untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkshopChange {
    /// The active count changed; carries the new value
    Changed(u32),
    /// Start requested while every workshop is already running
    AtCapacity,
    /// Stop requested while no workshop is running
    AllStopped,
}

/// Comparison operator for the inactive-percent filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmp {
    Greater,
    Less,
    /// Equality within [`PERCENT_EPSILON`]
    Equal,
}

/// Predicate for pipe searches
#[derive(Debug, Clone)]
pub enum PipeFilter {
    /// Case-insensitive substring match on the name
    NameContains(String),
    /// Exact match on the repair flag
    UnderRepair(bool),
}

/// Predicate for station searches
#[derive(Debug, Clone)]
pub enum StationFilter {
    /// Case-insensitive substring match on the name
    NameContains(String),
    /// Compare the derived inactive-percent metric against a target
    InactivePercent { cmp: Cmp, target: f64 },
}

/// Field overwrite for a pipe edit; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct PipeUpdate {
    pub name: Option<String>,
    pub length_km: Option<f64>,
    pub diameter_mm: Option<u32>,
}

/// Field overwrite for a station edit; `None` keeps the current value.
///
/// Shrinking the total below the current active count clamps active down.
#[derive(Debug, Clone, Default)]
pub struct StationUpdate {
    pub name: Option<String>,
    pub total_workshops: Option<u32>,
    pub station_class: Option<u32>,
}

/// Result of parsing an ID-list selection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    /// Matched IDs, deduplicated and ascending
    pub ids: Vec<u32>,
    /// One message per skipped token or unknown ID
    pub warnings: Vec<String>,
}

/// The in-memory inventory of pipes and compressor stations
#[derive(Debug, Clone, PartialEq)]
pub struct RecordStore {
    pipes: Vec<Pipe>,
    stations: Vec<CompressorStation>,
    next_pipe_id: u32,
    next_station_id: u32,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore {
    /// An empty store with both ID counters at 1
    pub fn new() -> Self {
        Self {
            pipes: Vec::new(),
            stations: Vec::new(),
            next_pipe_id: 1,
            next_station_id: 1,
        }
    }

    /// Rebuild a store from decoded parts, restoring the workshop invariant
    /// on every station
    pub fn from_parts(
        next_pipe_id: u32,
        next_station_id: u32,
        pipes: Vec<Pipe>,
        mut stations: Vec<CompressorStation>,
    ) -> Self {
        for station in &mut stations {
            station.clamp_active();
        }
        Self {
            pipes,
            stations,
            next_pipe_id,
            next_station_id,
        }
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    pub fn stations(&self) -> &[CompressorStation] {
        &self.stations
    }

    pub fn next_pipe_id(&self) -> u32 {
        self.next_pipe_id
    }

    pub fn next_station_id(&self) -> u32 {
        self.next_station_id
    }

    pub fn pipe(&self, id: u32) -> Option<&Pipe> {
        self.pipes.iter().find(|p| p.id == id)
    }

    pub fn station(&self, id: u32) -> Option<&CompressorStation> {
        self.stations.iter().find(|s| s.id == id)
    }

    // =====================================================================
    // Create
    // =====================================================================

    /// Append a new pipe and return its ID
    pub fn add_pipe(
        &mut self,
        name: impl Into<String>,
        length_km: f64,
        diameter_mm: u32,
    ) -> Result<u32, StoreError> {
        if length_km <= 0.0 || length_km.is_nan() {
            return Err(StoreError::Validation(format!(
                "pipe length must be positive, got {length_km}"
            )));
        }
        if diameter_mm == 0 {
            return Err(StoreError::Validation(
                "pipe diameter must be positive".into(),
            ));
        }

        let id = self.next_pipe_id;
        self.next_pipe_id += 1;
        self.pipes.push(Pipe {
            id,
            name: name.into(),
            length_km,
            diameter_mm,
            under_repair: false,
        });
        Ok(id)
    }

    /// Append a new compressor station and return its ID
    pub fn add_station(
        &mut self,
        name: impl Into<String>,
        total_workshops: u32,
        active_workshops: u32,
        station_class: u32,
    ) -> Result<u32, StoreError> {
        if total_workshops < 1 {
            return Err(StoreError::Validation(
                "a station needs at least one workshop".into(),
            ));
        }
        if active_workshops > total_workshops {
            return Err(StoreError::Validation(format!(
                "active workshops ({active_workshops}) cannot exceed total ({total_workshops})"
            )));
        }
        if station_class < 1 {
            return Err(StoreError::Validation(
                "station class must be at least 1".into(),
            ));
        }

        let id = self.next_station_id;
        self.next_station_id += 1;
        self.stations.push(CompressorStation {
            id,
            name: name.into(),
            total_workshops,
            active_workshops,
            station_class,
        });
        Ok(id)
    }

    // =====================================================================
    // Edit
    // =====================================================================

    /// Flip a pipe's repair flag, returning the new state
    pub fn toggle_repair(&mut self, id: u32) -> Result<bool, StoreError> {
        let pipe = self.pipe_mut(id)?;
        pipe.under_repair = !pipe.under_repair;
        Ok(pipe.under_repair)
    }

    /// Overwrite pipe fields, re-validating each supplied value
    pub fn update_pipe(&mut self, id: u32, update: PipeUpdate) -> Result<(), StoreError> {
        if let Some(length) = update.length_km {
            if length <= 0.0 || length.is_nan() {
                return Err(StoreError::Validation(format!(
                    "pipe length must be positive, got {length}"
                )));
            }
        }
        if update.diameter_mm == Some(0) {
            return Err(StoreError::Validation(
                "pipe diameter must be positive".into(),
            ));
        }

        let pipe = self.pipe_mut(id)?;
        if let Some(name) = update.name {
            pipe.name = name;
        }
        if let Some(length) = update.length_km {
            pipe.length_km = length;
        }
        if let Some(diameter) = update.diameter_mm {
            pipe.diameter_mm = diameter;
        }
        Ok(())
    }

    /// Overwrite station fields. Shrinking the total below the current
    /// active count clamps active down rather than failing.
    pub fn update_station(&mut self, id: u32, update: StationUpdate) -> Result<(), StoreError> {
        if update.total_workshops == Some(0) {
            return Err(StoreError::Validation(
                "a station needs at least one workshop".into(),
            ));
        }
        if update.station_class == Some(0) {
            return Err(StoreError::Validation(
                "station class must be at least 1".into(),
            ));
        }

        let station = self.station_mut(id)?;
        if let Some(name) = update.name {
            station.name = name;
        }
        if let Some(total) = update.total_workshops {
            station.total_workshops = total;
            station.clamp_active();
        }
        if let Some(class) = update.station_class {
            station.station_class = class;
        }
        Ok(())
    }

    /// Bring one more workshop online
    pub fn start_workshop(&mut self, id: u32) -> Result<WorkshopChange, StoreError> {
        let station = self.station_mut(id)?;
        if station.active_workshops < station.total_workshops {
            station.active_workshops += 1;
            Ok(WorkshopChange::Changed(station.active_workshops))
        } else {
            Ok(WorkshopChange::AtCapacity)
        }
    }

    /// Take one workshop offline
    pub fn stop_workshop(&mut self, id: u32) -> Result<WorkshopChange, StoreError> {
        let station = self.station_mut(id)?;
        if station.active_workshops > 0 {
            station.active_workshops -= 1;
            Ok(WorkshopChange::Changed(station.active_workshops))
        } else {
            Ok(WorkshopChange::AllStopped)
        }
    }

    // =====================================================================
    // Delete
    // =====================================================================

    /// Remove the pipes with the given IDs, returning them for reporting.
    /// Unknown IDs are skipped. Removal walks indices from high to low so
    /// earlier removals never shift a pending index.
    pub fn delete_pipes(&mut self, ids: &[u32]) -> Vec<Pipe> {
        let mut removed = Vec::new();
        for i in (0..self.pipes.len()).rev() {
            if ids.contains(&self.pipes[i].id) {
                removed.push(self.pipes.remove(i));
            }
        }
        removed.reverse();
        removed
    }

    /// Remove the stations with the given IDs, returning them for reporting
    pub fn delete_stations(&mut self, ids: &[u32]) -> Vec<CompressorStation> {
        let mut removed = Vec::new();
        for i in (0..self.stations.len()).rev() {
            if ids.contains(&self.stations[i].id) {
                removed.push(self.stations.remove(i));
            }
        }
        removed.reverse();
        removed
    }

    // =====================================================================
    // Search & selection
    // =====================================================================

    /// Linear scan of the pipe collection
    pub fn search_pipes(&self, filter: &PipeFilter) -> Vec<&Pipe> {
        self.pipes
            .iter()
            .filter(|pipe| match filter {
                PipeFilter::NameContains(needle) => {
                    pipe.name.to_lowercase().contains(&needle.to_lowercase())
                }
                PipeFilter::UnderRepair(status) => pipe.under_repair == *status,
            })
            .collect()
    }

    /// Linear scan of the station collection
    pub fn search_stations(&self, filter: &StationFilter) -> Vec<&CompressorStation> {
        self.stations
            .iter()
            .filter(|station| match filter {
                StationFilter::NameContains(needle) => {
                    station.name.to_lowercase().contains(&needle.to_lowercase())
                }
                StationFilter::InactivePercent { cmp, target } => {
                    let percent = station.inactive_percent();
                    match cmp {
                        Cmp::Greater => percent > *target,
                        Cmp::Less => percent < *target,
                        Cmp::Equal => (percent - target).abs() < PERCENT_EPSILON,
                    }
                }
            })
            .collect()
    }

    /// Parse a bulk selection: a comma-separated list of IDs, or the literal
    /// `all` (any case) meaning every record of the given kind. Tokens that
    /// are not numbers and IDs that do not exist become warnings, never
    /// errors. The result is deduplicated and ascending.
    pub fn select_ids(&self, input: &str, kind: RecordKind) -> Selection {
        let known: Vec<u32> = match kind {
            RecordKind::Pipe => self.pipes.iter().map(|p| p.id).collect(),
            RecordKind::Station => self.stations.iter().map(|s| s.id).collect(),
        };

        if input.trim().eq_ignore_ascii_case("all") {
            return Selection {
                ids: known,
                warnings: Vec::new(),
            };
        }

        let mut selection = Selection::default();
        for token in input.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            match token.parse::<u32>() {
                Ok(id) if known.contains(&id) => selection.ids.push(id),
                Ok(id) => selection
                    .warnings
                    .push(format!("{kind} ID {id} does not exist")),
                Err(_) => selection
                    .warnings
                    .push(format!("'{token}' is not a number")),
            }
        }
        selection.ids.sort_unstable();
        selection.ids.dedup();
        selection
    }

    fn pipe_mut(&mut self, id: u32) -> Result<&mut Pipe, StoreError> {
        self.pipes
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound {
                kind: RecordKind::Pipe,
                id,
            })
    }

    fn station_mut(&mut self, id: u32) -> Result<&mut CompressorStation, StoreError> {
        self.stations
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::NotFound {
                kind: RecordKind::Station,
                id,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> RecordStore {
        let mut store = RecordStore::new();
        store.add_pipe("Main line", 12.5, 500).unwrap();
        store.add_pipe("Northern spur", 3.2, 250).unwrap();
        store.add_station("CS1", 5, 3, 2).unwrap();
        store.add_station("CS2 backup", 4, 4, 1).unwrap();
        store
    }

    #[test]
    fn add_pipe_assigns_sequential_ids() {
        let mut store = RecordStore::new();
        assert_eq!(store.add_pipe("a", 1.0, 100).unwrap(), 1);
        assert_eq!(store.add_pipe("b", 1.0, 100).unwrap(), 2);
        assert!(!store.pipe(1).unwrap().under_repair);
    }

    #[test]
    fn ids_are_never_reused_after_deletion() {
        let mut store = RecordStore::new();
        store.add_pipe("a", 1.0, 100).unwrap();
        store.add_pipe("b", 1.0, 100).unwrap();
        store.delete_pipes(&[1, 2]);
        assert_eq!(store.add_pipe("c", 1.0, 100).unwrap(), 3);

        store.add_station("s1", 2, 0, 1).unwrap();
        store.delete_stations(&[1]);
        assert_eq!(store.add_station("s2", 2, 0, 1).unwrap(), 2);
    }

    #[test]
    fn add_pipe_rejects_bad_dimensions() {
        let mut store = RecordStore::new();
        assert!(matches!(
            store.add_pipe("a", 0.0, 100),
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            store.add_pipe("a", -2.0, 100),
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            store.add_pipe("a", 1.0, 0),
            Err(StoreError::Validation(_))
        ));
        assert!(store.pipes().is_empty());
    }

    #[test]
    fn add_station_enforces_workshop_invariant() {
        let mut store = RecordStore::new();
        assert!(matches!(
            store.add_station("s", 3, 4, 1),
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            store.add_station("s", 0, 0, 1),
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            store.add_station("s", 3, 1, 0),
            Err(StoreError::Validation(_))
        ));
        assert!(store.add_station("s", 3, 3, 1).is_ok());
    }

    #[test]
    fn toggle_repair_flips_state() {
        let mut store = sample_store();
        assert!(store.toggle_repair(1).unwrap());
        assert!(!store.toggle_repair(1).unwrap());
        assert!(matches!(
            store.toggle_repair(99),
            Err(StoreError::NotFound {
                kind: RecordKind::Pipe,
                id: 99
            })
        ));
    }

    #[test]
    fn update_pipe_overwrites_supplied_fields() {
        let mut store = sample_store();
        store
            .update_pipe(
                1,
                PipeUpdate {
                    name: Some("Renamed".into()),
                    length_km: Some(8.0),
                    diameter_mm: None,
                },
            )
            .unwrap();
        let pipe = store.pipe(1).unwrap();
        assert_eq!(pipe.name, "Renamed");
        assert_eq!(pipe.length_km, 8.0);
        assert_eq!(pipe.diameter_mm, 500);
    }

    #[test]
    fn update_pipe_rejects_bad_values_without_mutating() {
        let mut store = sample_store();
        assert!(store
            .update_pipe(
                1,
                PipeUpdate {
                    name: Some("x".into()),
                    length_km: Some(-1.0),
                    diameter_mm: None,
                },
            )
            .is_err());
        assert_eq!(store.pipe(1).unwrap().name, "Main line");
    }

    #[test]
    fn shrinking_total_clamps_active() {
        let mut store = sample_store();
        // CS1 runs 3 of 5; shrinking to 2 must pull active down with it
        store
            .update_station(
                1,
                StationUpdate {
                    total_workshops: Some(2),
                    ..Default::default()
                },
            )
            .unwrap();
        let station = store.station(1).unwrap();
        assert_eq!(station.total_workshops, 2);
        assert_eq!(station.active_workshops, 2);
    }

    #[test]
    fn workshop_transitions_respect_bounds() {
        let mut store = RecordStore::new();
        store.add_station("CS1", 5, 3, 2).unwrap();

        assert_eq!(store.stop_workshop(1).unwrap(), WorkshopChange::Changed(2));
        assert_eq!(store.stop_workshop(1).unwrap(), WorkshopChange::Changed(1));
        assert_eq!(store.stop_workshop(1).unwrap(), WorkshopChange::Changed(0));
        // Boundary is a reported no-op, not an error
        assert_eq!(store.stop_workshop(1).unwrap(), WorkshopChange::AllStopped);
        assert_eq!(store.station(1).unwrap().active_workshops, 0);

        for expected in 1..=5 {
            assert_eq!(
                store.start_workshop(1).unwrap(),
                WorkshopChange::Changed(expected)
            );
        }
        assert_eq!(store.start_workshop(1).unwrap(), WorkshopChange::AtCapacity);
        assert_eq!(store.station(1).unwrap().active_workshops, 5);
    }

    #[test]
    fn invariant_holds_after_every_edit_path() {
        let mut store = sample_store();
        store.start_workshop(1).unwrap();
        store.start_workshop(1).unwrap();
        store.start_workshop(1).unwrap();
        store
            .update_station(
                1,
                StationUpdate {
                    total_workshops: Some(1),
                    ..Default::default()
                },
            )
            .unwrap();
        for station in store.stations() {
            assert!(station.active_workshops <= station.total_workshops);
        }
    }

    #[test]
    fn search_pipes_by_name_is_case_insensitive_substring() {
        let store = sample_store();
        let hits = store.search_pipes(&PipeFilter::NameContains("MAIN".into()));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
        assert!(store
            .search_pipes(&PipeFilter::NameContains("river".into()))
            .is_empty());
    }

    #[test]
    fn search_pipes_by_repair_status() {
        let mut store = sample_store();
        store.toggle_repair(2).unwrap();
        let repairing = store.search_pipes(&PipeFilter::UnderRepair(true));
        assert_eq!(repairing.len(), 1);
        assert_eq!(repairing[0].id, 2);
        assert_eq!(store.search_pipes(&PipeFilter::UnderRepair(false)).len(), 1);
    }

    #[test]
    fn inactive_percent_equality_uses_epsilon() {
        let store = sample_store();
        // CS2 runs all 4 workshops: idle percent is exactly 0
        let exact = store.search_stations(&StationFilter::InactivePercent {
            cmp: Cmp::Equal,
            target: 0.0,
        });
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].id, 2);

        // A strict ">" with target 0 must exclude the fully-active station
        let above = store.search_stations(&StationFilter::InactivePercent {
            cmp: Cmp::Greater,
            target: 0.0,
        });
        assert_eq!(above.len(), 1);
        assert_eq!(above[0].id, 1);

        let below = store.search_stations(&StationFilter::InactivePercent {
            cmp: Cmp::Less,
            target: 40.0,
        });
        assert_eq!(below.len(), 1);
        assert_eq!(below[0].id, 2);
    }

    #[test]
    fn select_ids_parses_list_with_warnings() {
        let store = sample_store();
        let selection = store.select_ids("2, bogus, 1, 7, 2", RecordKind::Pipe);
        assert_eq!(selection.ids, vec![1, 2]);
        assert_eq!(selection.warnings.len(), 2);
        assert!(selection.warnings[0].contains("bogus"));
        assert!(selection.warnings[1].contains("7"));
    }

    #[test]
    fn select_ids_all_is_case_insensitive() {
        let store = sample_store();
        assert_eq!(store.select_ids("all", RecordKind::Pipe).ids, vec![1, 2]);
        assert_eq!(store.select_ids("ALL", RecordKind::Station).ids, vec![1, 2]);
        assert_eq!(store.select_ids(" All ", RecordKind::Pipe).ids, vec![1, 2]);
    }

    #[test]
    fn delete_all_then_search_finds_nothing() {
        let mut store = sample_store();
        let selection = store.select_ids("all", RecordKind::Pipe);
        let removed = store.delete_pipes(&selection.ids);
        assert_eq!(removed.len(), 2);
        assert!(store
            .search_pipes(&PipeFilter::NameContains("n".into()))
            .is_empty());
    }

    #[test]
    fn delete_returns_removed_records_in_ascending_order() {
        let mut store = sample_store();
        let removed = store.delete_stations(&[2, 1]);
        assert_eq!(removed.len(), 2);
        assert_eq!(removed[0].id, 1);
        assert_eq!(removed[1].id, 2);
        assert!(store.stations().is_empty());
        // Unknown IDs are skipped silently
        assert!(store.delete_stations(&[5]).is_empty());
    }
}
