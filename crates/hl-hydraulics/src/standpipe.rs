//! Standpipe pump pressure.

use crate::catalog::Catalog;
use crate::friction::{HoseSegment, friction_loss_total};
use hl_core::sanitize;
use serde::{Deserialize, Serialize};

/// Pressure per floor of rise used by most standpipe operations.
pub const DEFAULT_PSI_PER_FLOOR: f64 = 5.0;
/// Loss through the FDC and standpipe system.
pub const DEFAULT_STANDPIPE_APPLIANCE_LOSS_PSI: f64 = 25.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandpipeLayout {
    /// Pressure wanted at the outlet on the fire floor.
    pub outlet_psi: f64,
    pub appliance_loss_psi: f64,
    pub floors_up: f64,
    pub psi_per_floor: f64,
    pub flow_gpm: f64,
    /// Hose between the pump and the FDC.
    pub hose: HoseSegment,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandpipeBreakdown {
    pub hose_fl_psi: f64,
    pub elevation_psi: f64,
    pub pdp_psi: f64,
}

impl StandpipeLayout {
    pub fn elevation_psi(&self) -> f64 {
        sanitize(self.floors_up) * sanitize(self.psi_per_floor)
    }

    pub fn breakdown(&self, catalog: &Catalog) -> StandpipeBreakdown {
        let hose_fl_psi = friction_loss_total(catalog, self.flow_gpm, std::slice::from_ref(&self.hose));
        let elevation_psi = self.elevation_psi();
        StandpipeBreakdown {
            hose_fl_psi,
            elevation_psi,
            pdp_psi: sanitize(self.outlet_psi)
                + sanitize(self.appliance_loss_psi)
                + elevation_psi
                + hose_fl_psi,
        }
    }

    pub fn pdp(&self, catalog: &Catalog) -> f64 {
        self.breakdown(catalog).pdp_psi
    }

    pub fn acceptable(&self, catalog: &Catalog, pump_limit_psi: f64) -> bool {
        self.pdp(catalog) <= sanitize(pump_limit_psi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(floors_up: f64) -> StandpipeLayout {
        StandpipeLayout {
            outlet_psi: 100.0,
            appliance_loss_psi: DEFAULT_STANDPIPE_APPLIANCE_LOSS_PSI,
            floors_up,
            psi_per_floor: DEFAULT_PSI_PER_FLOOR,
            flow_gpm: 250.0,
            hose: HoseSegment::new("2.5", 100.0),
        }
    }

    #[test]
    fn sixth_floor_standpipe() {
        let catalog = Catalog::standard();
        let b = layout(5.0).breakdown(&catalog);
        assert!((b.hose_fl_psi - 12.5).abs() < 1e-9);
        assert_eq!(b.elevation_psi, 25.0);
        assert!((b.pdp_psi - 162.5).abs() < 1e-9);
        assert!(!layout(5.0).acceptable(&catalog, 150.0));
        assert!(layout(2.0).acceptable(&catalog, 150.0));
    }
}
