//! Nozzle definitions as consumed by the calculator.

use hl_core::sanitize;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handline nozzle: rated flow at its required nozzle pressure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nozzle {
    pub label: String,
    pub gpm: f64,
    pub required_pressure: f64,
}

impl Nozzle {
    pub fn new(label: impl Into<String>, gpm: f64, required_pressure: f64) -> Self {
        Self {
            label: label.into(),
            gpm,
            required_pressure,
        }
    }

    /// Flow with invalid values degraded to 0.
    pub fn flow(&self) -> f64 {
        sanitize(self.gpm)
    }

    pub fn np(&self) -> f64 {
        sanitize(self.required_pressure)
    }
}

impl fmt::Display for Nozzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} gpm @ {} psi NP)",
            self.label,
            hl_core::fmt_value(self.gpm),
            hl_core::fmt_value(self.required_pressure)
        )
    }
}

/// Master stream device, including the loss through its appliance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterNozzle {
    pub label: String,
    pub gpm: f64,
    pub required_pressure: f64,
    pub appliance_loss_psi: f64,
}

impl MasterNozzle {
    pub fn flow(&self) -> f64 {
        sanitize(self.gpm)
    }

    pub fn np(&self) -> f64 {
        sanitize(self.required_pressure)
    }

    pub fn appliance_loss(&self) -> f64 {
        sanitize(self.appliance_loss_psi)
    }
}

impl fmt::Display for MasterNozzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} gpm @ {} psi NP, {} psi appliance loss)",
            self.label,
            hl_core::fmt_value(self.gpm),
            hl_core::fmt_value(self.required_pressure),
            hl_core::fmt_value(self.appliance_loss_psi)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_rating() {
        let n = Nozzle::new("15/16\" smooth bore", 185.0, 50.0);
        assert_eq!(n.to_string(), "15/16\" smooth bore (185 gpm @ 50 psi NP)");
    }

    #[test]
    fn invalid_ratings_degrade() {
        let n = Nozzle::new("broken", f64::NAN, -10.0);
        assert_eq!(n.flow(), 0.0);
        assert_eq!(n.np(), 0.0);
    }
}
