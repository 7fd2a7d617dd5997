//! "Forgot a term" hints for wrong numeric answers.
//!
//! Each hypothesis recomputes the answer with one known mistake baked in. The
//! first hypothesis that lands the guess within tolerance is reported; if none
//! does, there is no hint.

use crate::answer::Expected;
use crate::question::{Question, QuestionKind, ReverseTarget};
use hl_core::fmt_value;
use hl_hydraulics::{Calculator, Derived};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MistakeKind {
    OmittedElevation,
    OmittedWyeLoss,
    OmittedApplianceLoss,
    UsedLowerBranch,
    ReportedTotalPdp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hint {
    pub kind: MistakeKind,
    pub message: String,
    /// Expected minus the mistaken value.
    pub missing_psi: f64,
}

struct Hypothesis {
    kind: MistakeKind,
    value: f64,
}

/// Match a wrong guess against known mistakes. `None` for correct guesses,
/// yes/no and multi-part questions, or when nothing explains the miss.
pub fn diagnose(calc: &Calculator<'_>, question: &Question, guess: f64) -> Option<Hint> {
    if !guess.is_finite() {
        return None;
    }
    let (expected, reverse) = match &question.kind {
        QuestionKind::Pp { expected } | QuestionKind::Adjust { expected, .. } => (expected, None),
        QuestionKind::Reverse { target, expected } => (expected, Some(*target)),
        QuestionKind::Check { .. } | QuestionKind::Multi { .. } => return None,
    };
    let Expected::Number { value, unit, tolerance, .. } = expected else {
        return None;
    };
    if (guess - value).abs() <= *tolerance {
        return None;
    }

    let derived = calc.derive(question.answered_scenario());
    let hypotheses = match reverse {
        None => pdp_hypotheses(&derived),
        Some(target) => reverse_hypotheses(target, &derived),
    };
    hypotheses.into_iter().find_map(|h| {
        let mistaken = unit.round(h.value);
        ((guess - mistaken).abs() <= *tolerance).then(|| Hint {
            kind: h.kind,
            message: message(h.kind, *value - mistaken),
            missing_psi: *value - mistaken,
        })
    })
}

fn pdp_hypotheses(d: &Derived) -> Vec<Hypothesis> {
    let mut out = Vec::new();
    if d.elevation_psi > 0.0 {
        out.push(Hypothesis {
            kind: MistakeKind::OmittedElevation,
            value: d.pdp_psi - d.elevation_psi,
        });
    }
    if d.wye_loss_psi() > 0.0 {
        out.push(Hypothesis {
            kind: MistakeKind::OmittedWyeLoss,
            value: d.pdp_psi - d.wye_loss_psi(),
        });
    }
    if d.appliance_loss_psi() > 0.0 {
        out.push(Hypothesis {
            kind: MistakeKind::OmittedApplianceLoss,
            value: d.pdp_psi - d.appliance_loss_psi(),
        });
    }
    if let (Some(high), Some(low)) = (d.higher_need(), d.lower_need()) {
        if high.need_psi > low.need_psi {
            out.push(Hypothesis {
                kind: MistakeKind::UsedLowerBranch,
                value: d.pdp_psi - high.need_psi + low.need_psi,
            });
        }
    }
    out
}

fn reverse_hypotheses(target: ReverseTarget, d: &Derived) -> Vec<Hypothesis> {
    let mut out = Vec::new();
    if target == ReverseTarget::HigherBranchNeed {
        if let Some(low) = d.lower_need() {
            out.push(Hypothesis {
                kind: MistakeKind::UsedLowerBranch,
                value: low.need_psi,
            });
        }
    }
    out.push(Hypothesis {
        kind: MistakeKind::ReportedTotalPdp,
        value: d.pdp_psi,
    });
    out
}

fn message(kind: MistakeKind, gap: f64) -> String {
    let gap = fmt_value(gap.abs());
    match kind {
        MistakeKind::OmittedElevation => {
            format!("Looks like you left out elevation pressure ({gap} psi).")
        }
        MistakeKind::OmittedWyeLoss => format!("Don't forget the {gap} psi loss through the wye."),
        MistakeKind::OmittedApplianceLoss => {
            format!("Master streams add appliance loss ({gap} psi) on top of nozzle pressure.")
        }
        MistakeKind::UsedLowerBranch => {
            "Pump to the branch that needs MORE pressure at the wye, not the easier one.".to_string()
        }
        MistakeKind::ReportedTotalPdp => {
            "That is the total pump pressure; the question asks for a part of it.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::Unit;
    use hl_hydraulics::{
        Branch, Catalog, ElevationRule, MasterLayout, MasterNozzle, Nozzle, Scenario, SingleLine,
        SupplyLine, WYE_LOSS_PSI, WyeLayout,
    };

    fn pp(calc: &Calculator<'_>, scenario: Scenario) -> Question {
        let expected = Expected::number(calc.pdp(&scenario), Unit::Psi, 5.0);
        Question {
            scenario,
            prompt: String::new(),
            kind: QuestionKind::Pp { expected },
        }
    }

    fn reference_wye() -> Scenario {
        Scenario::Wye2(WyeLayout {
            main_diameter: "2.5".into(),
            main_length_ft: 200.0,
            elevation_ft: 0.0,
            wye_loss_psi: WYE_LOSS_PSI,
            branch_a: Branch::new(100.0, Nozzle::new("Fog 150 @ 75", 150.0, 75.0)),
            branch_b: Branch::new(150.0, Nozzle::new("15/16\" smooth bore", 185.0, 50.0)),
        })
    }

    #[test]
    fn omitted_elevation() {
        let catalog = Catalog::standard();
        let calc = Calculator::new(&catalog, ElevationRule::LineEditor);
        let q = pp(
            &calc,
            Scenario::Single(SingleLine {
                main_diameter: "1.75".into(),
                main_length_ft: 200.0,
                elevation_ft: 40.0,
                nozzle: Nozzle::new("15/16\" smooth bore", 185.0, 50.0),
            }),
        );
        // 156.1 + 20 = 176; forgetting the 20 psi gives 156
        let hint = diagnose(&calc, &q, 156.0).unwrap();
        assert_eq!(hint.kind, MistakeKind::OmittedElevation);
        assert_eq!(hint.missing_psi, 20.0);
        assert!(hint.message.contains("20 psi"));
    }

    #[test]
    fn wye_mistakes() {
        let catalog = Catalog::standard();
        let calc = Calculator::new(&catalog, ElevationRule::LineEditor);
        let q = pp(&calc, reference_wye());
        // 184 without the 10 psi wye loss
        assert_eq!(diagnose(&calc, &q, 174.0).unwrap().kind, MistakeKind::OmittedWyeLoss);
        // 184 - 129.6 + 109.9 ≈ 164
        assert_eq!(diagnose(&calc, &q, 164.0).unwrap().kind, MistakeKind::UsedLowerBranch);
    }

    #[test]
    fn omitted_appliance_loss() {
        let catalog = Catalog::standard();
        let calc = Calculator::new(&catalog, ElevationRule::LineEditor);
        let q = pp(
            &calc,
            Scenario::Master(MasterLayout {
                elevation_ft: 0.0,
                master_nozzle: MasterNozzle {
                    label: "Master stream 750".into(),
                    gpm: 750.0,
                    required_pressure: 80.0,
                    appliance_loss_psi: 25.0,
                },
                line1: SupplyLine { length_ft: 200.0 },
                line2: SupplyLine { length_ft: 200.0 },
            }),
        );
        assert_eq!(diagnose(&calc, &q, 136.0).unwrap().kind, MistakeKind::OmittedApplianceLoss);
    }

    #[test]
    fn reverse_reported_total() {
        let catalog = Catalog::standard();
        let calc = Calculator::new(&catalog, ElevationRule::LineEditor);
        let derived = calc.derive(&reference_wye());
        let target = ReverseTarget::MainFrictionLoss;
        let q = Question {
            scenario: reference_wye(),
            prompt: String::new(),
            kind: QuestionKind::Reverse {
                target,
                expected: Expected::number(target.value(&derived), target.unit(), 5.0),
            },
        };
        assert_eq!(diagnose(&calc, &q, 184.0).unwrap().kind, MistakeKind::ReportedTotalPdp);
    }

    #[test]
    fn no_fabricated_hints() {
        let catalog = Catalog::standard();
        let calc = Calculator::new(&catalog, ElevationRule::LineEditor);
        let q = pp(&calc, reference_wye());
        assert!(diagnose(&calc, &q, 184.0).is_none(), "correct guess");
        assert!(diagnose(&calc, &q, 250.0).is_none(), "unexplained guess");
        assert!(diagnose(&calc, &q, f64::NAN).is_none());
    }
}
