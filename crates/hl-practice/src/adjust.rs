//! Single structural changes used by "adjust" questions.

use crate::error::PracticeResult;
use hl_core::{RandomSource, fmt_value, pick_uniform};
use hl_hydraulics::{
    BRANCH_DIAMETER, BranchId, Catalog, LineId, MasterNozzle, Nozzle, Scenario,
};
use serde::{Deserialize, Serialize};

pub const LENGTH_STEPS_FT: [f64; 2] = [50.0, 100.0];
pub const ELEVATION_STEPS_FT: [f64; 2] = [10.0, 20.0];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Adjustment {
    LengthenMain { add_ft: f64 },
    LengthenBranch { branch: BranchId, add_ft: f64 },
    LengthenSupply { line: LineId, add_ft: f64 },
    RaiseElevation { add_ft: f64 },
    SwapNozzle { nozzle: Nozzle },
    SwapBranchNozzle { branch: BranchId, nozzle: Nozzle },
    SwapMasterNozzle { nozzle: MasterNozzle },
}

impl Adjustment {
    /// Copy of `base` with this change applied. A change that does not fit the
    /// topology leaves the copy untouched.
    pub fn apply(&self, base: &Scenario) -> Scenario {
        let mut next = base.clone();
        match (self, &mut next) {
            (Adjustment::LengthenMain { add_ft }, Scenario::Single(s)) => s.main_length_ft += add_ft,
            (Adjustment::LengthenMain { add_ft }, Scenario::Wye2(w)) => w.main_length_ft += add_ft,
            (Adjustment::LengthenBranch { branch, add_ft }, Scenario::Wye2(w)) => {
                w.branch_mut(*branch).length_ft += add_ft;
            }
            (Adjustment::LengthenSupply { line, add_ft }, Scenario::Master(m)) => {
                m.line_mut(*line).length_ft += add_ft;
            }
            (Adjustment::RaiseElevation { add_ft }, scenario) => {
                let raised = scenario.elevation_ft() + add_ft;
                scenario.set_elevation_ft(raised);
            }
            (Adjustment::SwapNozzle { nozzle }, Scenario::Single(s)) => s.nozzle = nozzle.clone(),
            (Adjustment::SwapBranchNozzle { branch, nozzle }, Scenario::Wye2(w)) => {
                w.branch_mut(*branch).nozzle = nozzle.clone();
            }
            (Adjustment::SwapMasterNozzle { nozzle }, Scenario::Master(m)) => {
                m.master_nozzle = nozzle.clone();
            }
            (adjustment, scenario) => {
                tracing::warn!(
                    ?adjustment,
                    kind = scenario.kind().label(),
                    "adjustment does not fit layout; left unchanged"
                );
            }
        }
        next
    }

    /// Plain-language instruction shown in the prompt.
    pub fn describe(&self, base: &Scenario) -> String {
        match self {
            Adjustment::LengthenMain { add_ft } => match base {
                Scenario::Wye2(_) => format!("Add {}' to the line feeding the wye", fmt_value(*add_ft)),
                _ => format!("Add {}' to the attack line", fmt_value(*add_ft)),
            },
            Adjustment::LengthenBranch { branch, add_ft } => {
                format!("Add {}' to branch {}", fmt_value(*add_ft), branch.label())
            }
            Adjustment::LengthenSupply { line, add_ft } => {
                format!("Add {}' to supply line {}", fmt_value(*add_ft), line.number())
            }
            Adjustment::RaiseElevation { add_ft } => {
                format!("The crew advances {}' higher", fmt_value(*add_ft))
            }
            Adjustment::SwapNozzle { nozzle } => format!("Swap the nozzle for a {nozzle}"),
            Adjustment::SwapBranchNozzle { branch, nozzle } => {
                format!("Swap branch {}'s nozzle for a {nozzle}", branch.label())
            }
            Adjustment::SwapMasterNozzle { nozzle } => {
                format!("Swap the master stream device for a {nozzle}")
            }
        }
    }
}

#[derive(Debug, Clone)]
enum Change {
    LengthenMain,
    LengthenBranch(BranchId),
    LengthenSupply(LineId),
    RaiseElevation,
    SwapNozzle(Vec<Nozzle>),
    SwapBranchNozzle(BranchId, Vec<Nozzle>),
    SwapMasterNozzle(Vec<MasterNozzle>),
}

/// Pick one change appropriate to the layout's topology.
pub fn choose_adjustment(
    scenario: &Scenario,
    catalog: &Catalog,
    rng: &mut dyn RandomSource,
) -> PracticeResult<Adjustment> {
    let mut changes = Vec::new();
    match scenario {
        Scenario::Single(s) => {
            changes.extend([Change::LengthenMain, Change::RaiseElevation]);
            let options = handline_alternatives(catalog, &s.main_diameter, &s.nozzle);
            if !options.is_empty() {
                changes.push(Change::SwapNozzle(options));
            }
        }
        Scenario::Wye2(w) => {
            changes.extend([
                Change::LengthenMain,
                Change::LengthenBranch(BranchId::A),
                Change::LengthenBranch(BranchId::B),
                Change::RaiseElevation,
            ]);
            for id in [BranchId::A, BranchId::B] {
                let options = handline_alternatives(catalog, BRANCH_DIAMETER, &w.branch(id).nozzle);
                if !options.is_empty() {
                    changes.push(Change::SwapBranchNozzle(id, options));
                }
            }
        }
        Scenario::Master(m) => {
            changes.extend([
                Change::LengthenSupply(LineId::One),
                Change::LengthenSupply(LineId::Two),
                Change::RaiseElevation,
            ]);
            let options = master_alternatives(catalog, &m.master_nozzle);
            if !options.is_empty() {
                changes.push(Change::SwapMasterNozzle(options));
            }
        }
    }

    let adjustment = match pick_uniform(rng, &changes)? {
        Change::LengthenMain => Adjustment::LengthenMain {
            add_ft: *pick_uniform(rng, &LENGTH_STEPS_FT)?,
        },
        Change::LengthenBranch(branch) => Adjustment::LengthenBranch {
            branch: *branch,
            add_ft: *pick_uniform(rng, &LENGTH_STEPS_FT)?,
        },
        Change::LengthenSupply(line) => Adjustment::LengthenSupply {
            line: *line,
            add_ft: *pick_uniform(rng, &LENGTH_STEPS_FT)?,
        },
        Change::RaiseElevation => Adjustment::RaiseElevation {
            add_ft: *pick_uniform(rng, &ELEVATION_STEPS_FT)?,
        },
        Change::SwapNozzle(options) => Adjustment::SwapNozzle {
            nozzle: pick_uniform(rng, options)?.clone(),
        },
        Change::SwapBranchNozzle(branch, options) => Adjustment::SwapBranchNozzle {
            branch: *branch,
            nozzle: pick_uniform(rng, options)?.clone(),
        },
        Change::SwapMasterNozzle(options) => Adjustment::SwapMasterNozzle {
            nozzle: pick_uniform(rng, options)?.clone(),
        },
    };
    Ok(adjustment)
}

fn handline_alternatives(catalog: &Catalog, diameter: &str, current: &Nozzle) -> Vec<Nozzle> {
    catalog
        .handline_nozzles(diameter)
        .map(|def| def.nozzle())
        .filter(|n| n != current)
        .collect()
}

fn master_alternatives(catalog: &Catalog, current: &MasterNozzle) -> Vec<MasterNozzle> {
    catalog
        .master_nozzles()
        .filter_map(|def| def.master_nozzle())
        .filter(|n| n != current)
        .collect()
}
