//! Foam concentrate metering.

use hl_core::sanitize;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoamProportioning {
    pub solution_gpm: f64,
    /// Concentrate percentage, e.g. 3 for 3% AFFF.
    pub percent: f64,
    pub minutes: f64,
    pub onboard_gallons: f64,
}

impl FoamProportioning {
    pub fn concentrate_gpm(&self) -> f64 {
        sanitize(self.solution_gpm) * (sanitize(self.percent) / 100.0)
    }

    pub fn concentrate_gallons(&self) -> f64 {
        self.concentrate_gpm() * sanitize(self.minutes)
    }

    pub fn enough_onboard(&self) -> bool {
        sanitize(self.onboard_gallons) >= self.concentrate_gallons()
    }
}
