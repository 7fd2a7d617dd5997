//! Elevation pressure conventions.
//!
//! The line editor works with the 0.5 psi/ft fireground rule of thumb while the
//! standalone calculators use the hydrostatic 0.434 psi/ft. Both are kept as
//! named rules and picked per calculation context.

use hl_core::sanitize;
use serde::{Deserialize, Serialize};

pub const LINE_EDITOR_PSI_PER_FT: f64 = 0.5;
pub const HYDROSTATIC_PSI_PER_FT: f64 = 0.434;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ElevationRule {
    #[default]
    LineEditor,
    Hydrostatic,
    Custom {
        psi_per_ft: f64,
    },
}

impl ElevationRule {
    pub fn psi_per_ft(self) -> f64 {
        match self {
            ElevationRule::LineEditor => LINE_EDITOR_PSI_PER_FT,
            ElevationRule::Hydrostatic => HYDROSTATIC_PSI_PER_FT,
            ElevationRule::Custom { psi_per_ft } => sanitize(psi_per_ft),
        }
    }

    /// Pressure to lift water `elevation_ft`. Negative or invalid heights count as 0.
    pub fn pressure(self, elevation_ft: f64) -> f64 {
        sanitize(elevation_ft) * self.psi_per_ft()
    }
}
