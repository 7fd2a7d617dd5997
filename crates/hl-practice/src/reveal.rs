//! Step-by-step "show the math" breakdowns.
//!
//! A reveal is a pure function of the question and the calculator: building it
//! twice yields the same steps.

use crate::answer::{Expected, Unit, YesNo};
use crate::bank_eval::{AnswerKey, Part, standpipe};
use crate::question::{Question, QuestionKind, ReverseTarget};
use hl_core::{fmt_value, sanitize};
use hl_hydraulics::{
    Calculator, DerivedDetail, FoamProportioning, HoseSegment, MasterLayout, Scenario, SingleLine,
    TenderShuttle, WyeLayout,
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealStep {
    /// Stable handle used to mark which step a question asks for.
    pub id: String,
    pub label: String,
    pub formula: String,
    pub work: String,
    pub result: f64,
    pub unit: Option<Unit>,
    pub asked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<YesNo>,
}

impl RevealStep {
    fn new(id: &str, label: impl Into<String>, formula: &str, work: String, result: f64, unit: Unit) -> Self {
        Self {
            id: id.to_string(),
            label: label.into(),
            formula: formula.to_string(),
            work,
            result,
            unit: Some(unit),
            asked: false,
            verdict: None,
        }
    }

    fn verdict(id: &str, label: impl Into<String>, formula: &str, work: String, yes: bool) -> Self {
        Self {
            id: id.to_string(),
            label: label.into(),
            formula: formula.to_string(),
            work,
            result: if yes { 1.0 } else { 0.0 },
            unit: None,
            asked: false,
            verdict: Some(YesNo::from_bool(yes)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reveal {
    pub lead: String,
    pub steps: Vec<RevealStep>,
    /// Unrounded PDP of the layout the answer refers to.
    pub total_psi: f64,
    pub answers: Vec<Expected>,
}

const FL: &str = "FL = C × (Q/100)² × (L/100)";

fn fl_work(calc: &Calculator<'_>, gpm: f64, segment: &HoseSegment) -> String {
    format!(
        "{} × ({}/100)² × ({}/100)",
        fmt_value(calc.coefficient(&segment.diameter)),
        fmt_value(gpm),
        fmt_value(segment.length_ft)
    )
}

fn elevation_step(calc: &Calculator<'_>, elevation_ft: f64, elevation_psi: f64) -> RevealStep {
    RevealStep::new(
        "elevation",
        "Elevation",
        "E = psi/ft × rise",
        format!(
            "{} × {}",
            fmt_value(calc.elevation_rule().psi_per_ft()),
            fmt_value(sanitize(elevation_ft))
        ),
        elevation_psi,
        Unit::Psi,
    )
}

/// Calculation steps for a layout, ending in the PDP.
pub fn scenario_steps(calc: &Calculator<'_>, scenario: &Scenario) -> Vec<RevealStep> {
    match scenario {
        Scenario::Single(s) => single_steps(calc, s),
        Scenario::Wye2(w) => wye_steps(calc, w),
        Scenario::Master(m) => master_steps(calc, m),
    }
}

fn single_steps(calc: &Calculator<'_>, s: &SingleLine) -> Vec<RevealStep> {
    let d = calc.single_line(&s.nozzle, &s.main_segments(), s.elevation_ft);
    let DerivedDetail::Single { nozzle_psi, main_fl_psi } = d.detail else {
        return Vec::new();
    };
    let main = HoseSegment::new(s.main_diameter.clone(), s.main_length_ft);
    vec![
        RevealStep::new(
            "main_fl",
            format!("Friction loss, {}\" line", s.main_diameter),
            FL,
            fl_work(calc, d.total_flow_gpm, &main),
            main_fl_psi,
            Unit::Psi,
        ),
        elevation_step(calc, s.elevation_ft, d.elevation_psi),
        RevealStep::new(
            "pdp",
            "Pump discharge pressure",
            "PDP = NP + FL + E",
            format!(
                "{} + {} + {}",
                fmt_value(nozzle_psi),
                fmt_value(main_fl_psi),
                fmt_value(d.elevation_psi)
            ),
            d.pdp_psi,
            Unit::Psi,
        ),
    ]
}

fn wye_steps(calc: &Calculator<'_>, w: &WyeLayout) -> Vec<RevealStep> {
    let d = calc.derive(&Scenario::Wye2(w.clone()));
    let DerivedDetail::Wye2 {
        main_fl_psi,
        wye_loss_psi,
        branch_a,
        branch_b,
    } = d.detail
    else {
        return Vec::new();
    };
    let mut steps = Vec::new();
    for (id, branch, need) in [("a", &w.branch_a, branch_a), ("b", &w.branch_b, branch_b)] {
        let segment = HoseSegment::new(branch.diameter.clone(), branch.length_ft);
        let label = id.to_uppercase();
        steps.push(RevealStep::new(
            &format!("fl_{id}"),
            format!("Friction loss, branch {label}"),
            FL,
            fl_work(calc, need.gpm, &segment),
            need.fl_psi,
            Unit::Psi,
        ));
        steps.push(RevealStep::new(
            &format!("need_{id}"),
            format!("Pressure needed at the wye, branch {label}"),
            "need = NP + FL",
            format!("{} + {}", fmt_value(need.nozzle_psi), fmt_value(need.fl_psi)),
            need.need_psi,
            Unit::Psi,
        ));
    }
    steps.push(RevealStep::new(
        "total_flow",
        "Total flow through the main",
        "Q = Q_A + Q_B",
        format!("{} + {}", fmt_value(branch_a.gpm), fmt_value(branch_b.gpm)),
        d.total_flow_gpm,
        Unit::Gpm,
    ));
    let main = HoseSegment::new(w.main_diameter.clone(), w.main_length_ft);
    steps.push(RevealStep::new(
        "main_fl",
        format!("Friction loss, {}\" main", w.main_diameter),
        FL,
        fl_work(calc, d.total_flow_gpm, &main),
        main_fl_psi,
        Unit::Psi,
    ));
    steps.push(elevation_step(calc, w.elevation_ft, d.elevation_psi));
    steps.push(RevealStep::new(
        "pdp",
        "Pump discharge pressure",
        "PDP = max(need A, need B) + main FL + wye loss + E",
        format!(
            "{} + {} + {} + {}",
            fmt_value(branch_a.need_psi.max(branch_b.need_psi)),
            fmt_value(main_fl_psi),
            fmt_value(wye_loss_psi),
            fmt_value(d.elevation_psi)
        ),
        d.pdp_psi,
        Unit::Psi,
    ));
    steps
}

fn master_steps(calc: &Calculator<'_>, m: &MasterLayout) -> Vec<RevealStep> {
    let d = calc.derive(&Scenario::Master(m.clone()));
    let DerivedDetail::Master {
        nozzle_psi,
        per_line_gpm,
        line_fl_psi,
        appliance_loss_psi,
    } = d.detail
    else {
        return Vec::new();
    };
    let mut steps = vec![RevealStep::new(
        "per_line_gpm",
        "Flow per supply line",
        "Q_line = Q / 2",
        format!("{} / 2", fmt_value(d.total_flow_gpm)),
        per_line_gpm,
        Unit::Gpm,
    )];
    for (i, line) in [&m.line1, &m.line2].into_iter().enumerate() {
        let segments = line.segments();
        steps.push(RevealStep::new(
            &format!("line{}_fl", i + 1),
            format!("Friction loss, supply line {}", i + 1),
            FL,
            fl_work(calc, per_line_gpm, &segments[0]),
            line_fl_psi[i],
            Unit::Psi,
        ));
    }
    steps.push(elevation_step(calc, m.elevation_ft, d.elevation_psi));
    steps.push(RevealStep::new(
        "pdp",
        "Pump discharge pressure",
        "PDP = NP + max(line FL) + appliance + E",
        format!(
            "{} + {} + {} + {}",
            fmt_value(nozzle_psi),
            fmt_value(line_fl_psi[0].max(line_fl_psi[1])),
            fmt_value(appliance_loss_psi),
            fmt_value(d.elevation_psi)
        ),
        d.pdp_psi,
        Unit::Psi,
    ));
    steps
}

/// Step id a reverse target refers to in `scenario_steps`.
fn reverse_step_id(target: ReverseTarget, calc: &Calculator<'_>, scenario: &Scenario) -> &'static str {
    let d = calc.derive(scenario);
    match (target, &d.detail) {
        (ReverseTarget::TotalFlow, _) => "total_flow",
        (ReverseTarget::PerLineFlow, _) => "per_line_gpm",
        (ReverseTarget::MainFrictionLoss, _) => "main_fl",
        (ReverseTarget::HigherBranchNeed, DerivedDetail::Wye2 { branch_a, branch_b, .. }) => {
            if branch_a.need_psi >= branch_b.need_psi { "need_a" } else { "need_b" }
        }
        (ReverseTarget::HigherBranchNeed, _) => "pdp",
        (ReverseTarget::PerLineFrictionLoss, DerivedDetail::Master { line_fl_psi, .. }) => {
            if line_fl_psi[0] >= line_fl_psi[1] { "line1_fl" } else { "line2_fl" }
        }
        (ReverseTarget::PerLineFrictionLoss, _) => "pdp",
    }
}

fn mark(steps: &mut [RevealStep], id: &str) {
    for step in steps.iter_mut().filter(|s| s.id == id) {
        step.asked = true;
    }
}

/// Steps worked from the inputs a bank part actually used.
pub fn part_steps(calc: &Calculator<'_>, part: &Part) -> Vec<RevealStep> {
    let u = &part.uses;
    let n = |v: Option<f64>| v.unwrap_or(0.0);
    let id = format!("part_{}", part.id);
    let Some(key) = AnswerKey::parse(&part.answer_key) else {
        return Vec::new();
    };
    let shuttle = TenderShuttle::new(n(u.tank_gallons), n(u.turnaround_minutes));
    let foam = FoamProportioning {
        solution_gpm: n(u.solution_gpm),
        percent: n(u.percent),
        minutes: n(u.minutes),
        onboard_gallons: n(u.onboard_gallons),
    };
    let numeric = |formula: &str, work: String, result: f64| {
        let unit = match &part.expected {
            Expected::Number { unit, .. } => *unit,
            Expected::YesNo { .. } => key.unit(),
        };
        RevealStep::new(&id, part.prompt.clone(), formula, work, result, unit)
    };
    let step = match key {
        AnswerKey::TotalGpm | AnswerKey::Pdp | AnswerKey::MainFl | AnswerKey::HigherNeed | AnswerKey::ElevationPsi => {
            let value = part.expected.numeric_value().unwrap_or(0.0);
            numeric(key.as_str(), "from the layout".to_string(), value)
        }
        AnswerKey::TenderSustainedGpm => numeric(
            "sustained = tank / turnaround",
            format!("{} / {}", fmt_value(shuttle.tank_gallons), fmt_value(shuttle.turnaround_minutes)),
            shuttle.sustained_gpm(),
        ),
        AnswerKey::TenderCountNeeded => numeric(
            "tenders = ceil(required / sustained)",
            format!("ceil({} / {})", fmt_value(n(u.required_gpm)), fmt_value(shuttle.sustained_gpm())),
            shuttle.tenders_needed(n(u.required_gpm)),
        ),
        AnswerKey::TenderMaxTurnaround => numeric(
            "turnaround = tank / required",
            format!("{} / {}", fmt_value(shuttle.tank_gallons), fmt_value(n(u.required_gpm))),
            shuttle.max_turnaround_minutes(n(u.required_gpm)),
        ),
        AnswerKey::TenderCanSupply => RevealStep::verdict(
            &id,
            part.prompt.clone(),
            "sustained ≥ required",
            format!("{} ≥ {}", fmt_value(shuttle.sustained_gpm()), fmt_value(n(u.required_gpm))),
            shuttle.can_supply(n(u.required_gpm)),
        ),
        AnswerKey::FoamConcentrateGpm => numeric(
            "concentrate = solution × percent / 100",
            format!("{} × {} / 100", fmt_value(foam.solution_gpm), fmt_value(foam.percent)),
            foam.concentrate_gpm(),
        ),
        AnswerKey::FoamConcentrateGallons => numeric(
            "gallons = concentrate gpm × minutes",
            format!("{} × {}", fmt_value(foam.concentrate_gpm()), fmt_value(foam.minutes)),
            foam.concentrate_gallons(),
        ),
        AnswerKey::FoamEnoughYn => RevealStep::verdict(
            &id,
            part.prompt.clone(),
            "onboard ≥ needed",
            format!("{} ≥ {}", fmt_value(foam.onboard_gallons), fmt_value(foam.concentrate_gallons())),
            foam.enough_onboard(),
        ),
        AnswerKey::StandpipePdp | AnswerKey::StandpipeAcceptableYn => {
            let layout = standpipe(u);
            let b = layout.breakdown(calc.catalog());
            let work = format!(
                "{} + {} + {} × {} + {}",
                fmt_value(layout.outlet_psi),
                fmt_value(layout.appliance_loss_psi),
                fmt_value(layout.floors_up),
                fmt_value(layout.psi_per_floor),
                fmt_value(b.hose_fl_psi)
            );
            if key == AnswerKey::StandpipePdp {
                numeric("PDP = outlet + appliance + floors × psi/floor + hose FL", work, b.pdp_psi)
            } else {
                let limit = n(u.pump_limit_psi);
                RevealStep::verdict(
                    &id,
                    part.prompt.clone(),
                    "PDP ≤ pump limit",
                    format!("{} ≤ {}", fmt_value(b.pdp_psi), fmt_value(limit)),
                    layout.acceptable(calc.catalog(), limit),
                )
            }
        }
    };
    vec![RevealStep { asked: true, ..step }]
}

/// Full breakdown for a question, with the asked-for steps marked.
pub fn build_reveal(calc: &Calculator<'_>, question: &Question) -> Reveal {
    let scenario = question.answered_scenario();
    let total_psi = calc.pdp(scenario);
    let mut steps = scenario_steps(calc, scenario);
    let lead = match &question.kind {
        QuestionKind::Pp { .. } => {
            mark(&mut steps, "pdp");
            "Pump discharge pressure for this layout.".to_string()
        }
        QuestionKind::Adjust { adjustment, .. } => {
            mark(&mut steps, "pdp");
            format!("After the change ({}), recompute from scratch.", adjustment.describe(&question.scenario))
        }
        QuestionKind::Reverse { target, .. } => {
            mark(&mut steps, reverse_step_id(*target, calc, scenario));
            format!("The question asks for the {}, not the final PDP.", target.label())
        }
        QuestionKind::Check { limit_psi, .. } => {
            let pdp = hl_core::round_psi(total_psi);
            let mut verdict = RevealStep::verdict(
                "check",
                "Within the pump limit?",
                "PDP ≤ limit",
                format!("{} ≤ {}", fmt_value(pdp), fmt_value(*limit_psi)),
                pdp <= *limit_psi,
            );
            verdict.asked = true;
            steps.push(verdict);
            format!("Compare the PDP with the {} psi limit.", fmt_value(*limit_psi))
        }
        QuestionKind::Multi { parts, reveal_lead, .. } => {
            for part in parts {
                steps.extend(part_steps(calc, part));
            }
            reveal_lead
                .clone()
                .unwrap_or_else(|| "Work each part from the layout and the given inputs.".to_string())
        }
    };
    Reveal {
        lead,
        steps,
        total_psi,
        answers: question.expected_parts().into_iter().cloned().collect(),
    }
}

impl fmt::Display for Reveal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.lead)?;
        for (i, step) in self.steps.iter().enumerate() {
            let marker = if step.asked { "  <- asked" } else { "" };
            let result = match (step.verdict, step.unit) {
                (Some(v), _) => v.to_string(),
                (None, Some(unit)) if !unit.symbol().is_empty() => {
                    format!("{} {}", fmt_value(step.result), unit.symbol())
                }
                (None, _) => fmt_value(step.result),
            };
            writeln!(f, "{:>2}. {}: {}", i + 1, step.label, step.formula)?;
            writeln!(f, "    {} = {}{}", step.work, result, marker)?;
        }
        let answers: Vec<String> = self.answers.iter().map(ToString::to_string).collect();
        write!(f, "Answer: {}", answers.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::Bank;
    use crate::bank_eval::BankEvaluator;
    use hl_hydraulics::{Catalog, ElevationRule, MasterNozzle, Nozzle, SupplyLine};

    fn reference_single() -> Scenario {
        Scenario::Single(SingleLine {
            main_diameter: "1.75".into(),
            main_length_ft: 200.0,
            elevation_ft: 0.0,
            nozzle: Nozzle::new("15/16\" smooth bore", 185.0, 50.0),
        })
    }

    fn pp(calc: &Calculator<'_>, scenario: Scenario) -> Question {
        let expected = Expected::number(calc.pdp(&scenario), Unit::Psi, 5.0);
        Question {
            scenario,
            prompt: String::new(),
            kind: QuestionKind::Pp { expected },
        }
    }

    #[test]
    fn single_steps_end_in_pdp() {
        let catalog = Catalog::standard();
        let calc = Calculator::new(&catalog, ElevationRule::LineEditor);
        let reveal = build_reveal(&calc, &pp(&calc, reference_single()));
        let ids: Vec<&str> = reveal.steps.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["main_fl", "elevation", "pdp"]);
        assert_eq!(reveal.steps[0].work, "15.5 × (185/100)² × (200/100)");
        let last = reveal.steps.last().unwrap();
        assert!(last.asked);
        assert!((last.result - 156.0975).abs() < 1e-9);
        assert_eq!(reveal.answers[0].numeric_value(), Some(156.0));
    }

    #[test]
    fn reveal_is_idempotent() {
        let catalog = Catalog::standard();
        let calc = Calculator::new(&catalog, ElevationRule::LineEditor);
        let q = pp(&calc, reference_single());
        assert_eq!(build_reveal(&calc, &q), build_reveal(&calc, &q));
    }

    #[test]
    fn reverse_marks_governing_line() {
        let catalog = Catalog::standard();
        let calc = Calculator::new(&catalog, ElevationRule::LineEditor);
        let scenario = Scenario::Master(MasterLayout {
            elevation_ft: 0.0,
            master_nozzle: MasterNozzle {
                label: "Master stream 750".into(),
                gpm: 750.0,
                required_pressure: 80.0,
                appliance_loss_psi: 25.0,
            },
            line1: SupplyLine { length_ft: 150.0 },
            line2: SupplyLine { length_ft: 300.0 },
        });
        let target = ReverseTarget::PerLineFrictionLoss;
        let expected = Expected::number(target.value(&calc.derive(&scenario)), target.unit(), 5.0);
        let q = Question {
            scenario,
            prompt: String::new(),
            kind: QuestionKind::Reverse { target, expected },
        };
        let reveal = build_reveal(&calc, &q);
        let asked: Vec<&str> = reveal.steps.iter().filter(|s| s.asked).map(|s| s.id.as_str()).collect();
        assert_eq!(asked, ["line2_fl"]);
    }

    #[test]
    fn check_appends_verdict() {
        let catalog = Catalog::standard();
        let calc = Calculator::new(&catalog, ElevationRule::LineEditor);
        let q = Question {
            scenario: reference_single(),
            prompt: String::new(),
            kind: QuestionKind::Check {
                limit_psi: 150.0,
                expected: Expected::yes_no(false),
            },
        };
        let reveal = build_reveal(&calc, &q);
        let last = reveal.steps.last().unwrap();
        assert_eq!(last.verdict, Some(YesNo::No));
        assert_eq!(last.work, "156 ≤ 150");
        let text = reveal.to_string();
        assert!(text.contains("Within the pump limit?"));
        assert!(text.ends_with("Answer: N"));
    }

    #[test]
    fn multi_shows_part_work() {
        let catalog = Catalog::standard();
        let calc = Calculator::new(&catalog, ElevationRule::LineEditor);
        let bank = Bank::builtin();
        let q = BankEvaluator::new(calc, &bank)
            .evaluate(&bank.templates[0], reference_single())
            .unwrap();
        let reveal = build_reveal(&calc, &q);
        let sustained = reveal.steps.iter().find(|s| s.id == "part_sustained").unwrap();
        assert_eq!(sustained.work, "3000 / 15");
        assert_eq!(sustained.result, 200.0);
        let supply = reveal.steps.iter().find(|s| s.id == "part_supply").unwrap();
        assert_eq!(supply.verdict, Some(YesNo::Yes));
        assert_eq!(reveal.lead, "Sustained flow is tank size divided by turnaround time.");
    }
}
