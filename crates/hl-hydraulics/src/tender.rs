//! Tender shuttle sustained flow.

use hl_core::{safe_div, sanitize};
use serde::{Deserialize, Serialize};

/// A shuttle of tenders cycling between a fill site and the dump site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TenderShuttle {
    pub tank_gallons: f64,
    /// Full round trip: dump, travel, fill, return.
    pub turnaround_minutes: f64,
}

impl TenderShuttle {
    pub fn new(tank_gallons: f64, turnaround_minutes: f64) -> Self {
        Self {
            tank_gallons,
            turnaround_minutes,
        }
    }

    /// Flow one tender can sustain over time.
    pub fn sustained_gpm(&self) -> f64 {
        safe_div(self.tank_gallons, self.turnaround_minutes)
    }

    pub fn can_supply(&self, required_gpm: f64) -> bool {
        self.sustained_gpm() >= sanitize(required_gpm)
    }

    /// Tenders needed to hold `required_gpm`; 0 when either side is 0.
    pub fn tenders_needed(&self, required_gpm: f64) -> f64 {
        safe_div(required_gpm, self.sustained_gpm()).ceil()
    }

    /// Longest round trip that still sustains `required_gpm` with one tender.
    pub fn max_turnaround_minutes(&self, required_gpm: f64) -> f64 {
        safe_div(self.tank_gallons, required_gpm)
    }
}
