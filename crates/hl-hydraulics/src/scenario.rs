//! Hose layout scenarios.
//!
//! A scenario carries every number a renderer needs to draw the layout and
//! every input the calculator needs; derived hydraulics are never stored here.

use crate::friction::HoseSegment;
use crate::nozzle::{MasterNozzle, Nozzle};
use hl_core::fmt_value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed loss through a gated wye.
pub const WYE_LOSS_PSI: f64 = 10.0;
/// Wye branches are always attack-line size.
pub const BRANCH_DIAMETER: &str = "1.75";
/// Master stream supply lines.
pub const MASTER_SUPPLY_DIAMETER: &str = "2.5";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Scenario {
    #[serde(rename = "single")]
    Single(SingleLine),
    #[serde(rename = "wye2")]
    Wye2(WyeLayout),
    #[serde(rename = "master")]
    Master(MasterLayout),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Single,
    Wye2,
    Master,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] = [ScenarioKind::Single, ScenarioKind::Wye2, ScenarioKind::Master];

    pub fn label(self) -> &'static str {
        match self {
            ScenarioKind::Single => "single",
            ScenarioKind::Wye2 => "wye2",
            ScenarioKind::Master => "master",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleLine {
    pub main_diameter: String,
    pub main_length_ft: f64,
    pub elevation_ft: f64,
    pub nozzle: Nozzle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WyeLayout {
    pub main_diameter: String,
    pub main_length_ft: f64,
    pub elevation_ft: f64,
    pub wye_loss_psi: f64,
    pub branch_a: Branch,
    pub branch_b: Branch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub length_ft: f64,
    pub diameter: String,
    pub nozzle: Nozzle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterLayout {
    pub elevation_ft: f64,
    pub master_nozzle: MasterNozzle,
    pub line1: SupplyLine,
    pub line2: SupplyLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupplyLine {
    pub length_ft: f64,
}

impl SingleLine {
    pub fn main_segments(&self) -> Vec<HoseSegment> {
        vec![HoseSegment::new(self.main_diameter.clone(), self.main_length_ft)]
    }
}

impl WyeLayout {
    pub fn main_segments(&self) -> Vec<HoseSegment> {
        vec![HoseSegment::new(self.main_diameter.clone(), self.main_length_ft)]
    }

    pub fn branch(&self, id: BranchId) -> &Branch {
        match id {
            BranchId::A => &self.branch_a,
            BranchId::B => &self.branch_b,
        }
    }

    pub fn branch_mut(&mut self, id: BranchId) -> &mut Branch {
        match id {
            BranchId::A => &mut self.branch_a,
            BranchId::B => &mut self.branch_b,
        }
    }
}

impl Branch {
    pub fn new(length_ft: f64, nozzle: Nozzle) -> Self {
        Self {
            length_ft,
            diameter: BRANCH_DIAMETER.to_string(),
            nozzle,
        }
    }

    pub fn segments(&self) -> Vec<HoseSegment> {
        vec![HoseSegment::new(self.diameter.clone(), self.length_ft)]
    }
}

impl SupplyLine {
    pub fn segments(&self) -> Vec<HoseSegment> {
        vec![HoseSegment::new(MASTER_SUPPLY_DIAMETER, self.length_ft)]
    }
}

impl MasterLayout {
    pub fn line(&self, id: LineId) -> &SupplyLine {
        match id {
            LineId::One => &self.line1,
            LineId::Two => &self.line2,
        }
    }

    pub fn line_mut(&mut self, id: LineId) -> &mut SupplyLine {
        match id {
            LineId::One => &mut self.line1,
            LineId::Two => &mut self.line2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BranchId {
    A,
    B,
}

impl BranchId {
    pub fn label(self) -> &'static str {
        match self {
            BranchId::A => "A",
            BranchId::B => "B",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineId {
    One,
    Two,
}

impl LineId {
    pub fn number(self) -> u8 {
        match self {
            LineId::One => 1,
            LineId::Two => 2,
        }
    }
}

impl Scenario {
    pub fn kind(&self) -> ScenarioKind {
        match self {
            Scenario::Single(_) => ScenarioKind::Single,
            Scenario::Wye2(_) => ScenarioKind::Wye2,
            Scenario::Master(_) => ScenarioKind::Master,
        }
    }

    pub fn elevation_ft(&self) -> f64 {
        match self {
            Scenario::Single(s) => s.elevation_ft,
            Scenario::Wye2(w) => w.elevation_ft,
            Scenario::Master(m) => m.elevation_ft,
        }
    }

    pub fn set_elevation_ft(&mut self, elevation_ft: f64) {
        match self {
            Scenario::Single(s) => s.elevation_ft = elevation_ft,
            Scenario::Wye2(w) => w.elevation_ft = elevation_ft,
            Scenario::Master(m) => m.elevation_ft = elevation_ft,
        }
    }
}

fn elevation_text(elevation_ft: f64) -> String {
    if elevation_ft > 0.0 {
        format!("nozzle is {}' above the pump", fmt_value(elevation_ft))
    } else {
        "no elevation change".to_string()
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scenario::Single(s) => write!(
                f,
                "Single {}\" attack line, {}' long, {}; {}.",
                s.main_diameter,
                fmt_value(s.main_length_ft),
                s.nozzle,
                elevation_text(s.elevation_ft)
            ),
            Scenario::Wye2(w) => write!(
                f,
                "{}\" line, {}' long, to a gated wye ({} psi loss). \
                 Branch A: {}' of {}\" with {}. Branch B: {}' of {}\" with {}; {}.",
                w.main_diameter,
                fmt_value(w.main_length_ft),
                fmt_value(w.wye_loss_psi),
                fmt_value(w.branch_a.length_ft),
                w.branch_a.diameter,
                w.branch_a.nozzle,
                fmt_value(w.branch_b.length_ft),
                w.branch_b.diameter,
                w.branch_b.nozzle,
                elevation_text(w.elevation_ft)
            ),
            Scenario::Master(m) => write!(
                f,
                "{} fed by two {}\" lines of {}' and {}'; {}.",
                m.master_nozzle,
                MASTER_SUPPLY_DIAMETER,
                fmt_value(m.line1.length_ft),
                fmt_value(m.line2.length_ft),
                elevation_text(m.elevation_ft)
            ),
        }
    }
}
