//! Pump discharge pressure (PDP) calculator.
//!
//! All composition happens on unrounded values; rounding to whole psi is left
//! to the presentation boundary (`Derived::pdp_rounded`).

use crate::catalog::Catalog;
use crate::elevation::ElevationRule;
use crate::friction::{HoseSegment, friction_loss, friction_loss_total};
use crate::nozzle::{MasterNozzle, Nozzle};
use crate::scenario::{MasterLayout, Scenario, SingleLine, WyeLayout};
use hl_core::{round_psi, sanitize};
use serde::{Deserialize, Serialize};

/// One wye branch as seen by the calculator.
#[derive(Debug, Clone, Copy)]
pub struct BranchLine<'s> {
    pub nozzle: &'s Nozzle,
    pub segments: &'s [HoseSegment],
}

/// Pressure a branch needs at the wye.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BranchNeed {
    pub gpm: f64,
    pub nozzle_psi: f64,
    pub fl_psi: f64,
    pub need_psi: f64,
}

/// Everything computed from a scenario. Always recomputed, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Derived {
    pub total_flow_gpm: f64,
    pub elevation_psi: f64,
    pub pdp_psi: f64,
    pub detail: DerivedDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DerivedDetail {
    Single {
        nozzle_psi: f64,
        main_fl_psi: f64,
    },
    Wye2 {
        main_fl_psi: f64,
        wye_loss_psi: f64,
        branch_a: BranchNeed,
        branch_b: BranchNeed,
    },
    Master {
        nozzle_psi: f64,
        per_line_gpm: f64,
        line_fl_psi: [f64; 2],
        appliance_loss_psi: f64,
    },
}

impl Derived {
    pub fn pdp_rounded(&self) -> f64 {
        round_psi(self.pdp_psi)
    }

    /// Main line loss; for a master stream, the governing supply line.
    pub fn main_fl_psi(&self) -> f64 {
        match &self.detail {
            DerivedDetail::Single { main_fl_psi, .. } => *main_fl_psi,
            DerivedDetail::Wye2 { main_fl_psi, .. } => *main_fl_psi,
            DerivedDetail::Master { line_fl_psi, .. } => line_fl_psi[0].max(line_fl_psi[1]),
        }
    }

    pub fn higher_need(&self) -> Option<&BranchNeed> {
        match &self.detail {
            DerivedDetail::Wye2 {
                branch_a, branch_b, ..
            } => Some(if branch_a.need_psi >= branch_b.need_psi {
                branch_a
            } else {
                branch_b
            }),
            _ => None,
        }
    }

    pub fn lower_need(&self) -> Option<&BranchNeed> {
        match &self.detail {
            DerivedDetail::Wye2 {
                branch_a, branch_b, ..
            } => Some(if branch_a.need_psi >= branch_b.need_psi {
                branch_b
            } else {
                branch_a
            }),
            _ => None,
        }
    }

    pub fn per_line_gpm(&self) -> Option<f64> {
        match &self.detail {
            DerivedDetail::Master { per_line_gpm, .. } => Some(*per_line_gpm),
            _ => None,
        }
    }

    pub fn wye_loss_psi(&self) -> f64 {
        match &self.detail {
            DerivedDetail::Wye2 { wye_loss_psi, .. } => *wye_loss_psi,
            _ => 0.0,
        }
    }

    pub fn appliance_loss_psi(&self) -> f64 {
        match &self.detail {
            DerivedDetail::Master {
                appliance_loss_psi, ..
            } => *appliance_loss_psi,
            _ => 0.0,
        }
    }
}

/// Stateless calculator over an injected catalog and elevation convention.
#[derive(Debug, Clone, Copy)]
pub struct Calculator<'a> {
    catalog: &'a Catalog,
    elevation: ElevationRule,
}

impl<'a> Calculator<'a> {
    pub fn new(catalog: &'a Catalog, elevation: ElevationRule) -> Self {
        Self { catalog, elevation }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn elevation_rule(&self) -> ElevationRule {
        self.elevation
    }

    pub fn elevation_psi(&self, elevation_ft: f64) -> f64 {
        self.elevation.pressure(elevation_ft)
    }

    pub fn coefficient(&self, diameter: &str) -> f64 {
        self.catalog.coefficient(diameter)
    }

    pub fn friction_loss(&self, gpm: f64, segment: &HoseSegment) -> f64 {
        friction_loss(self.coefficient(&segment.diameter), gpm, segment.length_ft)
    }

    pub fn friction_loss_total(&self, gpm: f64, segments: &[HoseSegment]) -> f64 {
        friction_loss_total(self.catalog, gpm, segments)
    }

    pub fn branch_need(&self, branch: BranchLine<'_>) -> BranchNeed {
        let gpm = branch.nozzle.flow();
        let nozzle_psi = branch.nozzle.np();
        let fl_psi = self.friction_loss_total(gpm, branch.segments);
        BranchNeed {
            gpm,
            nozzle_psi,
            fl_psi,
            need_psi: nozzle_psi + fl_psi,
        }
    }

    pub fn single_line(&self, nozzle: &Nozzle, main: &[HoseSegment], elevation_ft: f64) -> Derived {
        let gpm = nozzle.flow();
        let nozzle_psi = nozzle.np();
        let main_fl_psi = self.friction_loss_total(gpm, main);
        let elevation_psi = self.elevation_psi(elevation_ft);
        Derived {
            total_flow_gpm: gpm,
            elevation_psi,
            pdp_psi: nozzle_psi + main_fl_psi + elevation_psi,
            detail: DerivedDetail::Single {
                nozzle_psi,
                main_fl_psi,
            },
        }
    }

    /// The pump must satisfy whichever branch needs more pressure at the wye.
    pub fn wye(
        &self,
        main: &[HoseSegment],
        branch_a: BranchLine<'_>,
        branch_b: BranchLine<'_>,
        wye_loss_psi: f64,
        elevation_ft: f64,
    ) -> Derived {
        let a = self.branch_need(branch_a);
        let b = self.branch_need(branch_b);
        let total_flow_gpm = a.gpm + b.gpm;
        let main_fl_psi = self.friction_loss_total(total_flow_gpm, main);
        let wye_loss_psi = sanitize(wye_loss_psi);
        let elevation_psi = self.elevation_psi(elevation_ft);
        Derived {
            total_flow_gpm,
            elevation_psi,
            pdp_psi: a.need_psi.max(b.need_psi) + main_fl_psi + wye_loss_psi + elevation_psi,
            detail: DerivedDetail::Wye2 {
                main_fl_psi,
                wye_loss_psi,
                branch_a: a,
                branch_b: b,
            },
        }
    }

    /// Parallel supply lines: the worse line governs, losses are not summed.
    pub fn master_stream(
        &self,
        nozzle: &MasterNozzle,
        per_line_gpm: f64,
        lines: [&[HoseSegment]; 2],
        elevation_ft: f64,
    ) -> Derived {
        let per_line_gpm = sanitize(per_line_gpm);
        let line_fl_psi = [
            self.friction_loss_total(per_line_gpm, lines[0]),
            self.friction_loss_total(per_line_gpm, lines[1]),
        ];
        let nozzle_psi = nozzle.np();
        let appliance_loss_psi = nozzle.appliance_loss();
        let elevation_psi = self.elevation_psi(elevation_ft);
        Derived {
            total_flow_gpm: nozzle.flow(),
            elevation_psi,
            pdp_psi: nozzle_psi
                + line_fl_psi[0].max(line_fl_psi[1])
                + appliance_loss_psi
                + elevation_psi,
            detail: DerivedDetail::Master {
                nozzle_psi,
                per_line_gpm,
                line_fl_psi,
                appliance_loss_psi,
            },
        }
    }

    pub fn single_line_pdp(&self, nozzle: &Nozzle, main: &[HoseSegment], elevation_ft: f64) -> f64 {
        self.single_line(nozzle, main, elevation_ft).pdp_psi
    }

    pub fn wye_pdp(
        &self,
        main: &[HoseSegment],
        branch_a: BranchLine<'_>,
        branch_b: BranchLine<'_>,
        wye_loss_psi: f64,
        elevation_ft: f64,
    ) -> f64 {
        self.wye(main, branch_a, branch_b, wye_loss_psi, elevation_ft)
            .pdp_psi
    }

    pub fn master_stream_pdp(
        &self,
        nozzle: &MasterNozzle,
        per_line_gpm: f64,
        lines: [&[HoseSegment]; 2],
        elevation_ft: f64,
    ) -> f64 {
        self.master_stream(nozzle, per_line_gpm, lines, elevation_ft)
            .pdp_psi
    }

    /// Compute every derived value for a scenario.
    pub fn derive(&self, scenario: &Scenario) -> Derived {
        match scenario {
            Scenario::Single(s) => self.derive_single(s),
            Scenario::Wye2(w) => self.derive_wye(w),
            Scenario::Master(m) => self.derive_master(m),
        }
    }

    pub fn pdp(&self, scenario: &Scenario) -> f64 {
        self.derive(scenario).pdp_psi
    }

    fn derive_single(&self, s: &SingleLine) -> Derived {
        self.single_line(&s.nozzle, &s.main_segments(), s.elevation_ft)
    }

    fn derive_wye(&self, w: &WyeLayout) -> Derived {
        let a_segments = w.branch_a.segments();
        let b_segments = w.branch_b.segments();
        self.wye(
            &w.main_segments(),
            BranchLine {
                nozzle: &w.branch_a.nozzle,
                segments: &a_segments,
            },
            BranchLine {
                nozzle: &w.branch_b.nozzle,
                segments: &b_segments,
            },
            w.wye_loss_psi,
            w.elevation_ft,
        )
    }

    fn derive_master(&self, m: &MasterLayout) -> Derived {
        let line1 = m.line1.segments();
        let line2 = m.line2.segments();
        self.master_stream(
            &m.master_nozzle,
            m.master_nozzle.flow() / 2.0,
            [&line1, &line2],
            m.elevation_ft,
        )
    }
}
