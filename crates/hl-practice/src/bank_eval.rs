//! Evaluation of bank templates against a grounding scenario.
//!
//! This is the only place that maps `answerKey` strings to formulas. Scenario
//! keys read the already-derived hydraulics; auxiliary keys run the tender,
//! foam and standpipe sub-models on the part's `uses` inputs.

use crate::answer::{AnswerType, Expected, Unit};
use crate::bank::{Bank, BankDefaults, PartTemplate, Template, Uses};
use crate::config::DEFAULT_TOLERANCE_PSI;
use crate::error::{PracticeError, PracticeResult};
use crate::question::{Question, QuestionKind};
use hl_core::{RandomSource, Weighted, fmt_value, weighted_pick};
use hl_hydraulics::{
    Calculator, DEFAULT_PSI_PER_FLOOR, DEFAULT_STANDPIPE_APPLIANCE_LOSS_PSI, Derived,
    FoamProportioning, HoseSegment, Scenario, ScenarioKind, StandpipeLayout, TenderShuttle,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_OUTLET_PSI: f64 = 100.0;
pub const DEFAULT_STANDPIPE_HOSE: &str = "2.5";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnswerKey {
    TotalGpm,
    Pdp,
    MainFl,
    HigherNeed,
    ElevationPsi,
    TenderSustainedGpm,
    TenderCanSupply,
    TenderCountNeeded,
    TenderMaxTurnaround,
    FoamConcentrateGpm,
    FoamConcentrateGallons,
    FoamEnoughYn,
    StandpipePdp,
    StandpipeAcceptableYn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Scenario,
    Tender,
    Foam,
    Standpipe,
}

impl AnswerKey {
    pub const ALL: [AnswerKey; 14] = [
        AnswerKey::TotalGpm,
        AnswerKey::Pdp,
        AnswerKey::MainFl,
        AnswerKey::HigherNeed,
        AnswerKey::ElevationPsi,
        AnswerKey::TenderSustainedGpm,
        AnswerKey::TenderCanSupply,
        AnswerKey::TenderCountNeeded,
        AnswerKey::TenderMaxTurnaround,
        AnswerKey::FoamConcentrateGpm,
        AnswerKey::FoamConcentrateGallons,
        AnswerKey::FoamEnoughYn,
        AnswerKey::StandpipePdp,
        AnswerKey::StandpipeAcceptableYn,
    ];

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key.trim())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AnswerKey::TotalGpm => "totalGpm",
            AnswerKey::Pdp => "PDP",
            AnswerKey::MainFl => "mainFL",
            AnswerKey::HigherNeed => "higherNeed",
            AnswerKey::ElevationPsi => "elevationPsi",
            AnswerKey::TenderSustainedGpm => "tenderSustainedGpm",
            AnswerKey::TenderCanSupply => "tenderCanSupply",
            AnswerKey::TenderCountNeeded => "tenderCountNeeded",
            AnswerKey::TenderMaxTurnaround => "tenderMaxTurnaround",
            AnswerKey::FoamConcentrateGpm => "foamConcentrateGpm",
            AnswerKey::FoamConcentrateGallons => "foamConcentrateGallons",
            AnswerKey::FoamEnoughYn => "foamEnoughYN",
            AnswerKey::StandpipePdp => "standpipePDP",
            AnswerKey::StandpipeAcceptableYn => "standpipeAcceptableYN",
        }
    }

    pub fn answer_type(self) -> AnswerType {
        match self {
            AnswerKey::TenderCanSupply | AnswerKey::FoamEnoughYn | AnswerKey::StandpipeAcceptableYn => {
                AnswerType::YesNo
            }
            _ => AnswerType::Number,
        }
    }

    /// Natural unit of a numeric key.
    pub fn unit(self) -> Unit {
        match self {
            AnswerKey::TotalGpm
            | AnswerKey::TenderSustainedGpm
            | AnswerKey::FoamConcentrateGpm => Unit::Gpm,
            AnswerKey::TenderCountNeeded => Unit::Count,
            AnswerKey::TenderMaxTurnaround => Unit::Minutes,
            AnswerKey::FoamConcentrateGallons => Unit::Gallons,
            _ => Unit::Psi,
        }
    }

    /// Topology a key needs, if any.
    pub fn requires(self) -> Option<ScenarioKind> {
        match self {
            AnswerKey::HigherNeed => Some(ScenarioKind::Wye2),
            _ => None,
        }
    }

    /// `uses` inputs that cannot be back-filled from the scenario.
    pub fn required_uses(self) -> &'static [&'static str] {
        match self {
            AnswerKey::TenderSustainedGpm
            | AnswerKey::TenderCanSupply
            | AnswerKey::TenderCountNeeded
            | AnswerKey::TenderMaxTurnaround => &["tankGallons", "turnaroundMinutes"],
            AnswerKey::FoamConcentrateGpm => &["percent"],
            AnswerKey::FoamConcentrateGallons => &["percent", "minutes"],
            AnswerKey::FoamEnoughYn => &["percent", "minutes", "onboardGallons"],
            AnswerKey::StandpipePdp | AnswerKey::StandpipeAcceptableYn => &["floorsUp", "hoseLenFt"],
            _ => &[],
        }
    }

    fn family(self) -> Family {
        match self {
            AnswerKey::TotalGpm
            | AnswerKey::Pdp
            | AnswerKey::MainFl
            | AnswerKey::HigherNeed
            | AnswerKey::ElevationPsi => Family::Scenario,
            AnswerKey::TenderSustainedGpm
            | AnswerKey::TenderCanSupply
            | AnswerKey::TenderCountNeeded
            | AnswerKey::TenderMaxTurnaround => Family::Tender,
            AnswerKey::FoamConcentrateGpm
            | AnswerKey::FoamConcentrateGallons
            | AnswerKey::FoamEnoughYn => Family::Foam,
            AnswerKey::StandpipePdp | AnswerKey::StandpipeAcceptableYn => Family::Standpipe,
        }
    }
}

/// One evaluated part of a multi-part question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub id: String,
    pub prompt: String,
    pub answer_key: String,
    pub answer_type: AnswerType,
    pub expected: Expected,
    /// Inputs actually used, including back-filled values.
    pub uses: Uses,
}

enum Value {
    Number(f64),
    YesNo(bool),
}

pub struct BankEvaluator<'a> {
    calc: Calculator<'a>,
    bank: &'a Bank,
    tolerance_psi: f64,
}

impl<'a> BankEvaluator<'a> {
    pub fn new(calc: Calculator<'a>, bank: &'a Bank) -> Self {
        Self {
            calc,
            bank,
            tolerance_psi: DEFAULT_TOLERANCE_PSI,
        }
    }

    /// Tolerance used when the pack sets no `tolerancePsi` of its own.
    pub fn with_tolerance(mut self, tolerance_psi: f64) -> Self {
        self.tolerance_psi = tolerance_psi;
        self
    }

    pub fn bank(&self) -> &'a Bank {
        self.bank
    }

    /// Whether every part of `template` can be answered for this topology.
    pub fn applies_to(template: &Template, kind: ScenarioKind) -> bool {
        template.parts.iter().all(|p| match AnswerKey::parse(&p.answer_key) {
            Some(key) => key.requires().is_none_or(|k| k == kind),
            None => false,
        })
    }

    pub fn applicable(&self, kind: ScenarioKind) -> Vec<&'a Template> {
        self.bank
            .templates
            .iter()
            .filter(|t| Self::applies_to(t, kind))
            .collect()
    }

    /// Weighted pick among applicable templates, then evaluate it.
    pub fn compose(&self, scenario: Scenario, rng: &mut dyn RandomSource) -> PracticeResult<Question> {
        let kind = scenario.kind();
        let choices: Vec<Weighted<&Template>> = self
            .applicable(kind)
            .into_iter()
            .map(|t| Weighted::new(t, t.weight))
            .collect();
        if choices.is_empty() {
            return Err(PracticeError::NoApplicableTemplate { kind: kind.label() });
        }
        let template = *weighted_pick(rng, &choices)?;
        tracing::debug!(template = %template.id, kind = kind.label(), "picked bank template");
        self.evaluate(template, scenario)
    }

    pub fn evaluate(&self, template: &Template, scenario: Scenario) -> PracticeResult<Question> {
        let derived = self.calc.derive(&scenario);
        let defaults = &self.bank.defaults;
        let parts = template
            .parts
            .iter()
            .map(|part| self.evaluate_part(part, &scenario, &derived, defaults))
            .collect::<PracticeResult<Vec<_>>>()?;

        let mut vars = grounding_vars(&derived);
        for part in &parts {
            merge_uses(&mut vars, &part.uses)?;
        }
        let lead = fill_placeholders(&template.prompt, &vars);
        let prompt = if lead.trim().is_empty() {
            scenario.to_string()
        } else {
            format!("{scenario} {lead}")
        };

        Ok(Question {
            scenario,
            prompt,
            kind: QuestionKind::Multi {
                template_id: template.id.clone(),
                chip: template.chip.clone(),
                reveal_lead: template.reveal_lead.clone(),
                parts,
            },
        })
    }

    fn evaluate_part(
        &self,
        part: &PartTemplate,
        scenario: &Scenario,
        derived: &Derived,
        defaults: &BankDefaults,
    ) -> PracticeResult<Part> {
        let key = AnswerKey::parse(&part.answer_key).ok_or_else(|| PracticeError::UnknownAnswerKey {
            key: part.answer_key.clone(),
        })?;
        if key.requires().is_some_and(|k| k != scenario.kind()) {
            return Err(PracticeError::InvalidTemplate {
                id: part.id.clone(),
                reason: format!("'{}' needs a {} layout", key.as_str(), key.requires().map_or("", |k| k.label())),
            });
        }
        let uses = resolve_uses(key, &part.uses, derived, defaults);
        let expected = match self.value(key, &uses, derived) {
            Value::Number(exact) => {
                let unit = part.unit.unwrap_or(key.unit());
                let tol = defaults.tolerance_psi.unwrap_or(self.tolerance_psi);
                let mut expected = Expected::number(exact, unit, tol);
                if let (Expected::Number { tolerance, .. }, Some(t)) = (&mut expected, part.tolerance) {
                    *tolerance = t;
                }
                expected
            }
            Value::YesNo(yes) => Expected::yes_no(yes),
        };

        let mut vars = grounding_vars(derived);
        merge_uses(&mut vars, &uses)?;
        Ok(Part {
            id: part.id.clone(),
            prompt: fill_placeholders(&part.prompt, &vars),
            answer_key: key.as_str().to_string(),
            answer_type: key.answer_type(),
            expected,
            uses,
        })
    }

    fn value(&self, key: AnswerKey, uses: &Uses, derived: &Derived) -> Value {
        let n = |v: Option<f64>| v.unwrap_or(0.0);
        let required = n(uses.required_gpm);
        let shuttle = || TenderShuttle::new(n(uses.tank_gallons), n(uses.turnaround_minutes));
        let foam = || FoamProportioning {
            solution_gpm: n(uses.solution_gpm),
            percent: n(uses.percent),
            minutes: n(uses.minutes),
            onboard_gallons: n(uses.onboard_gallons),
        };
        match key {
            AnswerKey::TotalGpm => Value::Number(derived.total_flow_gpm),
            AnswerKey::Pdp => Value::Number(derived.pdp_psi),
            AnswerKey::MainFl => Value::Number(derived.main_fl_psi()),
            AnswerKey::HigherNeed => Value::Number(derived.higher_need().map_or(0.0, |b| b.need_psi)),
            AnswerKey::ElevationPsi => Value::Number(derived.elevation_psi),
            AnswerKey::TenderSustainedGpm => Value::Number(shuttle().sustained_gpm()),
            AnswerKey::TenderCanSupply => Value::YesNo(shuttle().can_supply(required)),
            AnswerKey::TenderCountNeeded => Value::Number(shuttle().tenders_needed(required)),
            AnswerKey::TenderMaxTurnaround => Value::Number(shuttle().max_turnaround_minutes(required)),
            AnswerKey::FoamConcentrateGpm => Value::Number(foam().concentrate_gpm()),
            AnswerKey::FoamConcentrateGallons => Value::Number(foam().concentrate_gallons()),
            AnswerKey::FoamEnoughYn => Value::YesNo(foam().enough_onboard()),
            AnswerKey::StandpipePdp => Value::Number(standpipe(uses).pdp(self.calc.catalog())),
            AnswerKey::StandpipeAcceptableYn => Value::YesNo(
                standpipe(uses).acceptable(self.calc.catalog(), n(uses.pump_limit_psi)),
            ),
        }
    }
}

pub fn standpipe(uses: &Uses) -> StandpipeLayout {
    StandpipeLayout {
        outlet_psi: uses.outlet_psi.unwrap_or(DEFAULT_OUTLET_PSI),
        appliance_loss_psi: uses.appliance_loss.unwrap_or(DEFAULT_STANDPIPE_APPLIANCE_LOSS_PSI),
        floors_up: uses.floors_up.unwrap_or(0.0),
        psi_per_floor: uses.psi_per_floor.unwrap_or(DEFAULT_PSI_PER_FLOOR),
        flow_gpm: uses.flow_gpm.unwrap_or(0.0),
        hose: HoseSegment::new(
            uses.hose_diameter.as_deref().unwrap_or(DEFAULT_STANDPIPE_HOSE),
            uses.hose_len_ft.unwrap_or(0.0),
        ),
    }
}

/// Fill grounding values the template left out, for the key's sub-model only.
fn resolve_uses(key: AnswerKey, given: &Uses, derived: &Derived, defaults: &BankDefaults) -> Uses {
    let mut uses = given.clone();
    let total = derived.total_flow_gpm;
    match key.family() {
        Family::Scenario => {}
        Family::Tender => {
            uses.required_gpm.get_or_insert(total);
        }
        Family::Foam => {
            uses.solution_gpm.get_or_insert(total);
        }
        Family::Standpipe => {
            uses.flow_gpm.get_or_insert(total);
            uses.outlet_psi.get_or_insert(DEFAULT_OUTLET_PSI);
            uses.appliance_loss.get_or_insert(DEFAULT_STANDPIPE_APPLIANCE_LOSS_PSI);
            uses.psi_per_floor.get_or_insert(DEFAULT_PSI_PER_FLOOR);
            uses.hose_diameter.get_or_insert_with(|| DEFAULT_STANDPIPE_HOSE.to_string());
            if key == AnswerKey::StandpipeAcceptableYn {
                uses.pump_limit_psi.get_or_insert(defaults.pump_limit_psi);
            }
        }
    }
    uses
}

fn grounding_vars(derived: &Derived) -> BTreeMap<String, String> {
    let mut vars = BTreeMap::new();
    vars.insert("totalGpm".to_string(), fmt_value(derived.total_flow_gpm));
    vars.insert("PDP".to_string(), fmt_value(derived.pdp_rounded()));
    vars.insert("mainFL".to_string(), fmt_value(derived.main_fl_psi()));
    vars.insert("elevationPsi".to_string(), fmt_value(derived.elevation_psi));
    if let Some(need) = derived.higher_need() {
        vars.insert("higherNeed".to_string(), fmt_value(need.need_psi));
    }
    vars
}

fn merge_uses(vars: &mut BTreeMap<String, String>, uses: &Uses) -> PracticeResult<()> {
    if let serde_json::Value::Object(map) = serde_json::to_value(uses)? {
        for (name, value) in map {
            let text = match value {
                serde_json::Value::Number(n) => n.as_f64().map(fmt_value).unwrap_or_else(|| n.to_string()),
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            vars.insert(name, text);
        }
    }
    Ok(())
}

/// Replace `{name}` with known values; unknown placeholders are left as written.
pub fn fill_placeholders(text: &str, vars: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                match vars.get(name.trim()) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::YesNo;
    use hl_core::SequenceSource;
    use hl_hydraulics::{Branch, Catalog, ElevationRule, Nozzle, SingleLine, WYE_LOSS_PSI, WyeLayout};

    /// Single line flowing exactly 150 gpm.
    fn fog_line() -> Scenario {
        Scenario::Single(SingleLine {
            main_diameter: "1.75".into(),
            main_length_ft: 200.0,
            elevation_ft: 0.0,
            nozzle: Nozzle::new("Fog 150 @ 75", 150.0, 75.0),
        })
    }

    fn wye() -> Scenario {
        Scenario::Wye2(WyeLayout {
            main_diameter: "2.5".into(),
            main_length_ft: 200.0,
            elevation_ft: 0.0,
            wye_loss_psi: WYE_LOSS_PSI,
            branch_a: Branch::new(100.0, Nozzle::new("Fog 150 @ 75", 150.0, 75.0)),
            branch_b: Branch::new(150.0, Nozzle::new("15/16\" smooth bore", 185.0, 50.0)),
        })
    }

    fn part(key: &str, uses: Uses) -> PartTemplate {
        PartTemplate {
            id: key.to_string(),
            prompt: format!("{key}?"),
            answer_key: key.to_string(),
            unit: None,
            answer_type: None,
            uses,
            tolerance: None,
        }
    }

    fn template(parts: Vec<PartTemplate>) -> Template {
        Template {
            id: "t".into(),
            weight: 1.0,
            chip: None,
            prompt: String::new(),
            parts,
            reveal_lead: None,
        }
    }

    fn parts_of(q: &Question) -> &[Part] {
        match &q.kind {
            QuestionKind::Multi { parts, .. } => parts,
            other => panic!("expected multi, got {other:?}"),
        }
    }

    #[test]
    fn key_names_round_trip() {
        for key in AnswerKey::ALL {
            assert_eq!(AnswerKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(AnswerKey::parse("pumpRpm"), None);
    }

    #[test]
    fn builtin_tender_supplies_150_gpm() {
        let catalog = Catalog::standard();
        let bank = Bank::builtin();
        let eval = BankEvaluator::new(Calculator::new(&catalog, ElevationRule::LineEditor), &bank);
        let q = eval.evaluate(&bank.templates[0], fog_line()).unwrap();
        let parts = parts_of(&q);
        assert_eq!(parts[0].expected.numeric_value(), Some(150.0));
        assert_eq!(parts[1].expected.numeric_value(), Some(200.0));
        assert_eq!(parts[2].expected, Expected::YesNo { answer: YesNo::Yes });
        // back-filled from the scenario and echoed
        assert_eq!(parts[2].uses.required_gpm, Some(150.0));
        assert_eq!(parts[2].prompt, "Can the shuttle supply 150 gpm? (Y/N)");
        assert!(q.prompt.contains("3000 gal tenders on a 15 minute turnaround"));
    }

    #[test]
    fn tender_count_rounds_up() {
        let catalog = Catalog::standard();
        let bank = Bank::builtin();
        let eval = BankEvaluator::new(Calculator::new(&catalog, ElevationRule::LineEditor), &bank);
        let uses = Uses {
            tank_gallons: Some(2000.0),
            turnaround_minutes: Some(20.0),
            required_gpm: Some(250.0),
            ..Uses::default()
        };
        let q = eval
            .evaluate(&template(vec![part("tenderCountNeeded", uses)]), fog_line())
            .unwrap();
        let expected = &parts_of(&q)[0].expected;
        assert_eq!(expected.numeric_value(), Some(3.0));
        assert_eq!(expected.tolerance(), 0.0);
    }

    #[test]
    fn foam_uses_total_flow_as_solution() {
        let catalog = Catalog::standard();
        let bank = Bank::builtin();
        let eval = BankEvaluator::new(Calculator::new(&catalog, ElevationRule::LineEditor), &bank);
        let uses = Uses {
            percent: Some(6.0),
            minutes: Some(10.0),
            onboard_gallons: Some(40.0),
            ..Uses::default()
        };
        let q = eval
            .evaluate(
                &template(vec![
                    part("foamConcentrateGpm", uses.clone()),
                    part("foamConcentrateGallons", uses.clone()),
                    part("foamEnoughYN", uses),
                ]),
                fog_line(),
            )
            .unwrap();
        let parts = parts_of(&q);
        assert_eq!(parts[0].expected.numeric_value(), Some(9.0));
        assert_eq!(parts[1].expected.numeric_value(), Some(90.0));
        assert_eq!(parts[2].expected, Expected::yes_no(false));
        assert_eq!(parts[0].uses.solution_gpm, Some(150.0));
    }

    #[test]
    fn standpipe_fills_defaults_and_limit() {
        let catalog = Catalog::standard();
        let bank = Bank::builtin();
        let eval = BankEvaluator::new(Calculator::new(&catalog, ElevationRule::LineEditor), &bank);
        let uses = Uses {
            floors_up: Some(6.0),
            hose_len_ft: Some(100.0),
            flow_gpm: Some(200.0),
            ..Uses::default()
        };
        let q = eval
            .evaluate(
                &template(vec![
                    part("standpipePDP", uses.clone()),
                    part("standpipeAcceptableYN", uses),
                ]),
                fog_line(),
            )
            .unwrap();
        let parts = parts_of(&q);
        // 100 + 25 + 6×5 + 2×(2)²×1 = 163
        assert_eq!(parts[0].expected.numeric_value(), Some(163.0));
        assert_eq!(parts[1].expected, Expected::yes_no(false));
        assert_eq!(parts[1].uses.pump_limit_psi, Some(150.0));
        assert_eq!(parts[0].uses.pump_limit_psi, None);
    }

    #[test]
    fn higher_need_only_applies_to_wyes() {
        let t = template(vec![part("higherNeed", Uses::default())]);
        assert!(BankEvaluator::applies_to(&t, ScenarioKind::Wye2));
        assert!(!BankEvaluator::applies_to(&t, ScenarioKind::Single));

        let catalog = Catalog::standard();
        let bank = Bank {
            templates: vec![t],
            ..Bank::builtin()
        };
        let eval = BankEvaluator::new(Calculator::new(&catalog, ElevationRule::LineEditor), &bank);
        let mut rng = SequenceSource::new([0.5]);
        assert!(matches!(
            eval.compose(fog_line(), &mut rng),
            Err(PracticeError::NoApplicableTemplate { kind: "single" })
        ));
        let q = eval.compose(wye(), &mut rng).unwrap();
        // needB = 50 + 15.5 × 1.85² × 1.5
        assert_eq!(parts_of(&q)[0].expected.numeric_value(), Some(130.0));
    }

    #[test]
    fn tolerance_override_applies() {
        let catalog = Catalog::standard();
        let bank = Bank::builtin();
        let eval = BankEvaluator::new(Calculator::new(&catalog, ElevationRule::LineEditor), &bank);
        let mut p = part("PDP", Uses::default());
        p.tolerance = Some(2.0);
        let q = eval.evaluate(&template(vec![p]), fog_line()).unwrap();
        assert_eq!(parts_of(&q)[0].expected.tolerance(), 2.0);
    }

    #[test]
    fn pack_without_tolerance_uses_practice_tolerance() {
        let catalog = Catalog::standard();
        let calc = Calculator::new(&catalog, ElevationRule::LineEditor);
        let t = template(vec![part("PDP", Uses::default())]);

        let bank = Bank::builtin();
        assert_eq!(bank.defaults.tolerance_psi, None);
        let q = BankEvaluator::new(calc, &bank)
            .with_tolerance(8.0)
            .evaluate(&t, fog_line())
            .unwrap();
        assert_eq!(parts_of(&q)[0].expected.tolerance(), 8.0);

        let mut strict = Bank::builtin();
        strict.defaults.tolerance_psi = Some(3.0);
        let q = BankEvaluator::new(calc, &strict)
            .with_tolerance(8.0)
            .evaluate(&t, fog_line())
            .unwrap();
        assert_eq!(parts_of(&q)[0].expected.tolerance(), 3.0);
    }

    #[test]
    fn placeholders_fill_known_and_keep_unknown() {
        let mut vars = BTreeMap::new();
        vars.insert("totalGpm".to_string(), "335".to_string());
        assert_eq!(
            fill_placeholders("Flow {totalGpm} gpm, {missing} and {unclosed", &vars),
            "Flow 335 gpm, {missing} and {unclosed"
        );
    }
}
