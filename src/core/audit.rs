//! Audit trail - append-only log of mutating operations and menu selections
//!
//! Purely observational: the file is never read back, and a sink that fails
//! to open degrades to a no-op so auditing can never abort an operation.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use chrono::Local;

/// Default audit file, written in the working directory
pub const DEFAULT_LOG_FILE: &str = "pipeline_log.txt";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Append-only audit sink
pub struct AuditLog {
    file: Option<File>,
}

impl AuditLog {
    /// Open (creating if needed) the audit file in append mode.
    /// On failure the log silently becomes a no-op sink.
    pub fn open(path: &Path) -> Self {
        let file = OpenOptions::new().create(true).append(true).open(path).ok();
        Self { file }
    }

    /// A sink that discards everything
    pub fn disabled() -> Self {
        Self { file: None }
    }

    /// Append one timestamped `action | details` line
    pub fn record(&mut self, action: &str, details: &str) {
        let Some(file) = &mut self.file else {
            return;
        };
        let stamp = Local::now().format(TIMESTAMP_FORMAT);
        let line = if details.is_empty() {
            format!("{stamp} | {action}\n")
        } else {
            format!("{stamp} | {action} | {details}\n")
        };
        // Write failures are swallowed: auditing must not break the operation
        let _ = file.write_all(line.as_bytes());
    }

    /// Mark the start of an interactive session
    pub fn session_started(&mut self) {
        if let Some(file) = &mut self.file {
            let stamp = Local::now().format(TIMESTAMP_FORMAT);
            let _ = writeln!(file, "\n=== Session started: {stamp}");
        }
    }

    /// Mark the end of an interactive session
    pub fn session_ended(&mut self) {
        if let Some(file) = &mut self.file {
            let stamp = Local::now().format(TIMESTAMP_FORMAT);
            let _ = writeln!(file, "=== Session ended: {stamp}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn record_appends_timestamped_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.txt");

        let mut log = AuditLog::open(&path);
        log.record("pipe added", "ID: 1, name: Main");
        log.record("program exit", "");
        drop(log);

        let mut log = AuditLog::open(&path);
        log.record("second session", "appends");
        drop(log);

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("| pipe added | ID: 1, name: Main"));
        assert!(lines[1].ends_with("| program exit"));
        assert!(lines[2].ends_with("| second session | appends"));
    }

    #[test]
    fn disabled_sink_writes_nothing() {
        let mut log = AuditLog::disabled();
        log.record("pipe added", "ignored");
        log.session_started();
        log.session_ended();
    }
}
