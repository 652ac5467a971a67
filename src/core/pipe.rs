//! Pipe segment entity type

use serde::{Deserialize, Serialize};

/// A managed pipe segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    /// Unique ID, assigned sequentially from 1 and never reused
    pub id: u32,

    /// Human-readable name
    pub name: String,

    /// Length in kilometres, strictly positive
    pub length_km: f64,

    /// Diameter in millimetres, strictly positive
    pub diameter_mm: u32,

    /// Whether the segment is currently out of service for repair
    pub under_repair: bool,
}

impl Pipe {
    /// Status label for display and audit messages
    pub fn status_label(&self) -> &'static str {
        if self.under_repair {
            "under repair"
        } else {
            "in service"
        }
    }
}

impl std::fmt::Display for Pipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ID: {} | {}, length: {} km, diameter: {} mm, {}",
            self.id,
            self.name,
            self.length_km,
            self.diameter_mm,
            self.status_label()
        )
    }
}
