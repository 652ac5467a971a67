//! Persistence codec - line-oriented text snapshots of the record store
//!
//! Schema v1 layout:
//!
//! ```text
//! NEXT_PIPE_ID <n>
//! NEXT_STATION_ID <n>
//! PIPES <count>
//! <id> / <name> / <length> / <diameter> / <0|1>     (one field per line)
//! STATIONS <count>
//! <id> / <name> / <total> / <active> / <class>      (one field per line)
//! ```
//!
//! Files written before the counter header existed (legacy v0) start directly
//! at the `PIPES` marker; decode accepts them by defaulting both counters
//! to 1. Encode always writes the full v1 header.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::pipe::Pipe;
use crate::core::station::CompressorStation;
use crate::core::store::RecordStore;

const PIPE_ID_HEADER: &str = "NEXT_PIPE_ID";
const STATION_ID_HEADER: &str = "NEXT_STATION_ID";
const PIPES_MARKER: &str = "PIPES";
const STATIONS_MARKER: &str = "STATIONS";

/// Errors from encoding or decoding a snapshot
#[derive(Debug, Error)]
pub enum CodecError {
    /// A required section marker is absent or misspelled
    #[error("missing {0} marker - not a pipenet snapshot")]
    MissingMarker(&'static str),

    /// A line does not parse as the expected field
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    /// Reading or writing the snapshot file failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Serialize a store to the v1 text format
pub fn encode(store: &RecordStore) -> String {
    let mut out = String::new();
    out.push_str(&format!("{PIPE_ID_HEADER} {}\n", store.next_pipe_id()));
    out.push_str(&format!("{STATION_ID_HEADER} {}\n", store.next_station_id()));

    out.push_str(&format!("{PIPES_MARKER} {}\n", store.pipes().len()));
    for pipe in store.pipes() {
        out.push_str(&format!(
            "{}\n{}\n{}\n{}\n{}\n",
            pipe.id,
            pipe.name,
            pipe.length_km,
            pipe.diameter_mm,
            u8::from(pipe.under_repair)
        ));
    }

    out.push_str(&format!("{STATIONS_MARKER} {}\n", store.stations().len()));
    for station in store.stations() {
        out.push_str(&format!(
            "{}\n{}\n{}\n{}\n{}\n",
            station.id,
            station.name,
            station.total_workshops,
            station.active_workshops,
            station.station_class
        ));
    }
    out
}

/// Parse a snapshot into a fresh store.
///
/// The result fully replaces any in-memory state; decoding never merges.
/// The workshop invariant is re-clamped on every loaded station.
pub fn decode(text: &str) -> Result<RecordStore, CodecError> {
    let mut cursor = Cursor::new(text);

    // Legacy v0 files have no counter header; rewind and treat the first
    // line as the PIPES marker.
    let (next_pipe_id, next_station_id) = match cursor.peek() {
        Some(line) if line.starts_with(PIPE_ID_HEADER) => {
            let pipe_id = cursor.marker_count(PIPE_ID_HEADER)?;
            let station_id = cursor.marker_count(STATION_ID_HEADER)?;
            (pipe_id, station_id)
        }
        _ => (1, 1),
    };

    let pipe_count = cursor.marker_count(PIPES_MARKER)?;
    let mut pipes = Vec::with_capacity(pipe_count as usize);
    for _ in 0..pipe_count {
        pipes.push(decode_pipe(&mut cursor)?);
    }

    let station_count = cursor.marker_count(STATIONS_MARKER)?;
    let mut stations = Vec::with_capacity(station_count as usize);
    for _ in 0..station_count {
        stations.push(decode_station(&mut cursor)?);
    }

    Ok(RecordStore::from_parts(
        next_pipe_id,
        next_station_id,
        pipes,
        stations,
    ))
}

/// Write a snapshot to disk. A filename without an extension gains `.txt`.
/// Returns the path actually written.
pub fn save_to_file(store: &RecordStore, filename: &str) -> Result<PathBuf, CodecError> {
    let path = default_extension(filename);
    fs::write(&path, encode(store))?;
    Ok(path)
}

/// Read and decode a snapshot from disk
pub fn load_from_file(path: &Path) -> Result<RecordStore, CodecError> {
    let text = fs::read_to_string(path)?;
    decode(&text)
}

/// Append `.txt` when the supplied name carries no extension at all
fn default_extension(filename: &str) -> PathBuf {
    if Path::new(filename).extension().is_none() {
        PathBuf::from(format!("{filename}.txt"))
    } else {
        PathBuf::from(filename)
    }
}

fn decode_pipe(cursor: &mut Cursor) -> Result<Pipe, CodecError> {
    let id = cursor.field::<u32>("pipe ID")?;
    let name = cursor.raw_field("pipe name")?.to_string();
    let length_km = cursor.field::<f64>("pipe length")?;
    let diameter_mm = cursor.field::<u32>("pipe diameter")?;
    let under_repair = cursor.flag_field("pipe repair flag")?;
    Ok(Pipe {
        id,
        name,
        length_km,
        diameter_mm,
        under_repair,
    })
}

fn decode_station(cursor: &mut Cursor) -> Result<CompressorStation, CodecError> {
    let id = cursor.field::<u32>("station ID")?;
    let name = cursor.raw_field("station name")?.to_string();
    let total_workshops = cursor.field::<u32>("workshop total")?;
    let active_workshops = cursor.field::<u32>("active workshop count")?;
    let station_class = cursor.field::<u32>("station class")?;
    Ok(CompressorStation {
        id,
        name,
        total_workshops,
        active_workshops,
        station_class,
    })
}

/// Line-at-a-time reader that tracks 1-based line numbers for error reports
struct Cursor<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    fn next_line(&mut self, expected: &str) -> Result<&'a str, CodecError> {
        let line = self
            .lines
            .get(self.pos)
            .copied()
            .ok_or_else(|| CodecError::Malformed {
                line: self.pos + 1,
                reason: format!("unexpected end of file, expected {expected}"),
            })?;
        self.pos += 1;
        Ok(line)
    }

    /// A marker line of the shape `NAME <number>`. A wrong or absent marker
    /// name means the file is not a snapshot at all; a bad count is a
    /// malformed snapshot.
    fn marker_count(&mut self, marker: &'static str) -> Result<u32, CodecError> {
        let line_no = self.pos + 1;
        let Some(line) = self.lines.get(self.pos).copied() else {
            return Err(CodecError::MissingMarker(marker));
        };
        self.pos += 1;

        let Some((name, count)) = line.split_once(' ') else {
            return Err(CodecError::MissingMarker(marker));
        };
        if name != marker {
            return Err(CodecError::MissingMarker(marker));
        }
        count.trim().parse().map_err(|_| CodecError::Malformed {
            line: line_no,
            reason: format!("'{count}' is not a valid {marker} count"),
        })
    }

    fn raw_field(&mut self, what: &str) -> Result<&'a str, CodecError> {
        self.next_line(what)
    }

    fn field<T: std::str::FromStr>(&mut self, what: &str) -> Result<T, CodecError> {
        let line_no = self.pos + 1;
        let raw = self.next_line(what)?;
        raw.trim().parse().map_err(|_| CodecError::Malformed {
            line: line_no,
            reason: format!("'{raw}' is not a valid {what}"),
        })
    }

    /// A 0/1 boolean field
    fn flag_field(&mut self, what: &str) -> Result<bool, CodecError> {
        let line_no = self.pos + 1;
        let raw = self.next_line(what)?;
        match raw.trim() {
            "0" => Ok(false),
            "1" => Ok(true),
            other => Err(CodecError::Malformed {
                line: line_no,
                reason: format!("'{other}' is not a valid {what}, expected 0 or 1"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::RecordStore;

    fn populated_store() -> RecordStore {
        let mut store = RecordStore::new();
        store.add_pipe("Main", 12.5, 500).unwrap();
        store.add_pipe("Spur", 3.25, 250).unwrap();
        store.add_station("CS1", 5, 3, 2).unwrap();
        store.toggle_repair(1).unwrap();
        store.delete_pipes(&[2]);
        store
    }

    #[test]
    fn round_trip_preserves_records_and_counters() {
        let store = populated_store();
        let mut decoded = decode(&encode(&store)).unwrap();
        assert_eq!(decoded, store);
        // Counters survive, so the next pipe still gets ID 3
        assert_eq!(decoded.add_pipe("New", 1.0, 100).unwrap(), 3);
    }

    #[test]
    fn encode_emits_expected_lines() {
        let mut store = RecordStore::new();
        store.add_pipe("Main", 12.5, 500).unwrap();
        let text = encode(&store);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "NEXT_PIPE_ID 2",
                "NEXT_STATION_ID 1",
                "PIPES 1",
                "1",
                "Main",
                "12.5",
                "500",
                "0",
                "STATIONS 0",
            ]
        );
    }

    #[test]
    fn decode_accepts_legacy_headerless_files() {
        let text = "PIPES 1\n1\nOld main\n7.5\n300\n1\nSTATIONS 0\n";
        let store = decode(text).unwrap();
        let pipe = store.pipe(1).unwrap();
        assert_eq!(pipe.name, "Old main");
        assert!(pipe.under_repair);
        // Counters default to 1... legacy files predate ID persistence
        assert_eq!(store.next_pipe_id(), 1);
        assert_eq!(store.next_station_id(), 1);
    }

    #[test]
    fn decode_clamps_active_workshops() {
        let text = "NEXT_PIPE_ID 1\nNEXT_STATION_ID 2\nPIPES 0\nSTATIONS 1\n1\nCS1\n3\n9\n2\n";
        let store = decode(text).unwrap();
        let station = store.station(1).unwrap();
        assert_eq!(station.active_workshops, 3);
    }

    #[test]
    fn decode_rejects_missing_markers() {
        assert!(matches!(
            decode("NEXT_PIPE_ID 1\nNEXT_STATION_ID 1\nTUBES 0\nSTATIONS 0\n"),
            Err(CodecError::MissingMarker(PIPES_MARKER))
        ));
        assert!(matches!(
            decode("PIPES 0\n"),
            Err(CodecError::MissingMarker(STATIONS_MARKER))
        ));
    }

    #[test]
    fn decode_reports_malformed_fields_with_line_numbers() {
        let text = "PIPES 1\n1\nMain\ntwelve\n500\n0\nSTATIONS 0\n";
        match decode(text) {
            Err(CodecError::Malformed { line, reason }) => {
                assert_eq!(line, 4);
                assert!(reason.contains("twelve"));
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn decode_rejects_truncated_records() {
        let text = "PIPES 2\n1\nMain\n12.5\n500\n0\n";
        assert!(matches!(decode(text), Err(CodecError::Malformed { .. })));
    }

    #[test]
    fn save_defaults_txt_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = populated_store();
        let name = dir.path().join("backup").to_string_lossy().into_owned();
        let written = save_to_file(&store, &name).unwrap();
        assert_eq!(written.extension().unwrap(), "txt");

        let named = dir.path().join("snap.dat").to_string_lossy().into_owned();
        let written = save_to_file(&store, &named).unwrap();
        assert_eq!(written.extension().unwrap(), "dat");
        assert_eq!(load_from_file(&written).unwrap(), store);
    }
}
