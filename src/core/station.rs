//! Compressor station entity type

use serde::{Deserialize, Serialize};

/// A managed compressor station facility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressorStation {
    /// Unique ID, assigned sequentially from 1 and never reused
    pub id: u32,

    /// Human-readable name
    pub name: String,

    /// Total workshop count, at least 1
    pub total_workshops: u32,

    /// Running workshops; invariant: never exceeds `total_workshops`
    pub active_workshops: u32,

    /// Station class rating, at least 1
    pub station_class: u32,
}

impl CompressorStation {
    /// Share of workshops currently idle, as a percentage in `[0, 100]`.
    ///
    /// Defined as `100 * (total - active) / total`, and 0 when `total` is 0.
    pub fn inactive_percent(&self) -> f64 {
        if self.total_workshops == 0 {
            0.0
        } else {
            100.0 * (self.total_workshops - self.active_workshops) as f64
                / self.total_workshops as f64
        }
    }

    /// Restore the workshop invariant after `total_workshops` changes
    pub(crate) fn clamp_active(&mut self) {
        if self.active_workshops > self.total_workshops {
            self.active_workshops = self.total_workshops;
        }
    }
}

impl std::fmt::Display for CompressorStation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ID: {} | {}, workshops: {}/{} running, idle: {:.1}%, class: {}",
            self.id,
            self.name,
            self.active_workshops,
            self.total_workshops,
            self.inactive_percent(),
            self.station_class
        )
    }
}
