//! Declarative multi-part question packs.
//!
//! A pack is read-only configuration. Loading is forgiving: a missing or
//! malformed file, or one whose templates are all unusable, yields the built-in
//! tender-shuttle pack instead of an error. `try_load_bank` is the strict path
//! used by tooling that wants to see the problems.

use crate::answer::{AnswerType, Unit};
use crate::bank_eval::AnswerKey;
use crate::error::{PracticeError, PracticeResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where practice front ends look for the pack, relative to the working directory.
pub const DEFAULT_BANK_PATH: &str = "banks/practice_bank.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bank {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub pack_id: Option<String>,
    #[serde(default)]
    pub defaults: BankDefaults,
    pub templates: Vec<Template>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BankDefaults {
    /// Pack-wide tolerance. When absent the practice config's tolerance applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance_psi: Option<f64>,
    pub pump_limit_psi: f64,
}

impl Default for BankDefaults {
    fn default() -> Self {
        Self {
            tolerance_psi: None,
            pump_limit_psi: 150.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub chip: Option<String>,
    #[serde(default)]
    pub prompt: String,
    pub parts: Vec<PartTemplate>,
    #[serde(default)]
    pub reveal_lead: Option<String>,
}

fn default_weight() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartTemplate {
    pub id: String,
    pub prompt: String,
    pub answer_key: String,
    #[serde(default)]
    pub unit: Option<Unit>,
    #[serde(default)]
    pub answer_type: Option<AnswerType>,
    #[serde(default)]
    pub uses: Uses,
    /// Overrides the unit's default tolerance.
    #[serde(default)]
    pub tolerance: Option<f64>,
}

/// Auxiliary-model inputs for one part. Omitted grounding values are
/// back-filled from the scenario at evaluation time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Uses {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tank_gallons: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turnaround_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_gpm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution_gpm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onboard_gallons: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outlet_psi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appliance_loss: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floors_up: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psi_per_floor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_gpm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hose_len_ft: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hose_diameter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pump_limit_psi: Option<f64>,
}

impl Uses {
    /// Whether a named (camelCase) input is present.
    pub fn has(&self, name: &str) -> bool {
        match name {
            "tankGallons" => self.tank_gallons.is_some(),
            "turnaroundMinutes" => self.turnaround_minutes.is_some(),
            "requiredGpm" => self.required_gpm.is_some(),
            "solutionGpm" => self.solution_gpm.is_some(),
            "percent" => self.percent.is_some(),
            "minutes" => self.minutes.is_some(),
            "onboardGallons" => self.onboard_gallons.is_some(),
            "outletPsi" => self.outlet_psi.is_some(),
            "applianceLoss" => self.appliance_loss.is_some(),
            "floorsUp" => self.floors_up.is_some(),
            "psiPerFloor" => self.psi_per_floor.is_some(),
            "flowGpm" => self.flow_gpm.is_some(),
            "hoseLenFt" => self.hose_len_ft.is_some(),
            "hoseDiameter" => self.hose_diameter.is_some(),
            "pumpLimitPsi" => self.pump_limit_psi.is_some(),
            _ => false,
        }
    }

    fn numbers(&self) -> [(&'static str, Option<f64>); 14] {
        [
            ("tankGallons", self.tank_gallons),
            ("turnaroundMinutes", self.turnaround_minutes),
            ("requiredGpm", self.required_gpm),
            ("solutionGpm", self.solution_gpm),
            ("percent", self.percent),
            ("minutes", self.minutes),
            ("onboardGallons", self.onboard_gallons),
            ("outletPsi", self.outlet_psi),
            ("applianceLoss", self.appliance_loss),
            ("floorsUp", self.floors_up),
            ("psiPerFloor", self.psi_per_floor),
            ("flowGpm", self.flow_gpm),
            ("hoseLenFt", self.hose_len_ft),
            ("pumpLimitPsi", self.pump_limit_psi),
        ]
    }
}

impl Template {
    /// Structural checks; answer-key semantics are owned by the evaluator.
    pub fn validate(&self) -> PracticeResult<()> {
        let invalid = |reason: String| PracticeError::InvalidTemplate {
            id: self.id.clone(),
            reason,
        };
        if self.id.trim().is_empty() {
            return Err(invalid("empty id".to_string()));
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(invalid(format!("weight must be non-negative (got {})", self.weight)));
        }
        if self.parts.is_empty() {
            return Err(invalid("no parts".to_string()));
        }
        for part in &self.parts {
            let key = AnswerKey::parse(&part.answer_key).ok_or_else(|| {
                invalid(format!("part '{}': unknown answer key '{}'", part.id, part.answer_key))
            })?;
            match part.answer_type {
                Some(declared) if declared != key.answer_type() => {
                    return Err(invalid(format!(
                        "part '{}': answerType {declared:?} does not match key '{}'",
                        part.id, part.answer_key
                    )));
                }
                _ => {}
            }
            if let Some(missing) = key.required_uses().iter().find(|name| !part.uses.has(name)) {
                return Err(invalid(format!("part '{}': uses.{missing} is required", part.id)));
            }
            let bad_number = |v: &f64| !v.is_finite() || *v < 0.0;
            for (name, value) in part.uses.numbers() {
                if value.as_ref().is_some_and(bad_number) {
                    return Err(invalid(format!("part '{}': uses.{name} must be non-negative", part.id)));
                }
            }
            if part.tolerance.as_ref().is_some_and(bad_number) {
                return Err(invalid(format!("part '{}': tolerance must be non-negative", part.id)));
            }
        }
        Ok(())
    }
}

impl Bank {
    /// Embedded default: a single tender-shuttle template.
    pub fn builtin() -> Self {
        let tender = Uses {
            tank_gallons: Some(3000.0),
            turnaround_minutes: Some(15.0),
            ..Uses::default()
        };
        Bank {
            version: Some("1".to_string()),
            pack_id: Some("builtin-tender".to_string()),
            defaults: BankDefaults::default(),
            templates: vec![Template {
                id: "tender-shuttle".to_string(),
                weight: 1.0,
                chip: Some("Tender shuttle".to_string()),
                prompt: "Water supply is a tender shuttle: {tankGallons} gal tenders on a \
                         {turnaroundMinutes} minute turnaround."
                    .to_string(),
                parts: vec![
                    PartTemplate {
                        id: "flow".to_string(),
                        prompt: "What total flow does the fireground need?".to_string(),
                        answer_key: "totalGpm".to_string(),
                        unit: Some(Unit::Gpm),
                        answer_type: Some(AnswerType::Number),
                        uses: Uses::default(),
                        tolerance: None,
                    },
                    PartTemplate {
                        id: "sustained".to_string(),
                        prompt: "What flow can the shuttle sustain?".to_string(),
                        answer_key: "tenderSustainedGpm".to_string(),
                        unit: Some(Unit::Gpm),
                        answer_type: Some(AnswerType::Number),
                        uses: tender.clone(),
                        tolerance: None,
                    },
                    PartTemplate {
                        id: "supply".to_string(),
                        prompt: "Can the shuttle supply {requiredGpm} gpm? (Y/N)".to_string(),
                        answer_key: "tenderCanSupply".to_string(),
                        unit: None,
                        answer_type: Some(AnswerType::YesNo),
                        uses: tender,
                        tolerance: None,
                    },
                ],
                reveal_lead: Some("Sustained flow is tank size divided by turnaround time.".to_string()),
            }],
        }
    }

    pub fn from_json_str(content: &str) -> PracticeResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> PracticeResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn validate(&self) -> PracticeResult<()> {
        if self.templates.is_empty() {
            return Err(PracticeError::InvalidBank {
                reason: "no templates".to_string(),
            });
        }
        for d in self.defaults.tolerance_psi.into_iter().chain([self.defaults.pump_limit_psi]) {
            if !d.is_finite() || d < 0.0 {
                return Err(PracticeError::InvalidBank {
                    reason: format!("defaults must be non-negative (got {d})"),
                });
            }
        }
        self.templates.iter().try_for_each(Template::validate)
    }

    /// Keep only usable templates; `None` when nothing survives.
    pub fn sanitized(mut self) -> Option<Self> {
        if let Some(t) = self.defaults.tolerance_psi.filter(|t| !t.is_finite() || *t < 0.0) {
            tracing::warn!(value = t, "bad tolerancePsi default; using the practice tolerance");
            self.defaults.tolerance_psi = None;
        }
        if !self.defaults.pump_limit_psi.is_finite() || self.defaults.pump_limit_psi < 0.0 {
            tracing::warn!(value = self.defaults.pump_limit_psi, "bad pumpLimitPsi default; using 150");
            self.defaults.pump_limit_psi = BankDefaults::default().pump_limit_psi;
        }
        self.templates.retain(|t| match t.validate() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "dropping bank template");
                false
            }
        });
        if self.templates.is_empty() { None } else { Some(self) }
    }
}

fn parse_by_extension(path: &Path, content: &str) -> PracticeResult<Bank> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => Bank::from_yaml_str(content),
        _ => Bank::from_json_str(content),
    }
}

/// Strict load: any I/O, parse or template problem is an error.
pub fn try_load_bank(path: &Path) -> PracticeResult<Bank> {
    let content = std::fs::read_to_string(path)?;
    let bank = parse_by_extension(path, &content)?;
    bank.validate()?;
    tracing::info!(path = %path.display(), templates = bank.templates.len(), "loaded bank");
    Ok(bank)
}

/// Forgiving load used by practice sessions. Never fails.
pub fn load_bank(path: &Path) -> Bank {
    let parsed = std::fs::read_to_string(path)
        .map_err(PracticeError::from)
        .and_then(|content| parse_by_extension(path, &content));
    match parsed {
        Ok(bank) => match bank.sanitized() {
            Some(bank) => {
                tracing::info!(path = %path.display(), templates = bank.templates.len(), "loaded bank");
                bank
            }
            None => {
                tracing::warn!(path = %path.display(), "bank has no usable templates; using built-in");
                Bank::builtin()
            }
        },
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "bank unavailable; using built-in");
            Bank::builtin()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_is_valid() {
        let bank = Bank::builtin();
        bank.validate().unwrap();
        assert_eq!(bank.templates.len(), 1);
        assert_eq!(bank.templates[0].parts[1].uses.tank_gallons, Some(3000.0));
    }

    #[test]
    fn missing_templates_is_a_parse_error() {
        let err = Bank::from_json_str(r#"{"version":"1","packId":"x"}"#).unwrap_err();
        assert!(matches!(err, PracticeError::Json(_)));
    }

    #[test]
    fn camel_case_fields_parse() {
        let bank = Bank::from_json_str(
            r#"{
              "defaults": {"pumpLimitPsi": 175},
              "templates": [{
                "id": "foam",
                "parts": [{
                  "id": "c", "prompt": "Concentrate?", "answerKey": "foamConcentrateGpm",
                  "unit": "gpm", "answerType": "number", "uses": {"percent": 3}
                }]
              }]
            }"#,
        )
        .unwrap();
        assert_eq!(bank.defaults.pump_limit_psi, 175.0);
        assert_eq!(bank.defaults.tolerance_psi, None);
        assert_eq!(bank.templates[0].weight, 1.0);
        assert_eq!(bank.templates[0].parts[0].uses.percent, Some(3.0));
        bank.validate().unwrap();
    }

    #[test]
    fn unknown_key_template_is_dropped() {
        let mut bank = Bank::builtin();
        let mut bad = bank.templates[0].clone();
        bad.id = "bad".into();
        bad.parts[0].answer_key = "pumpRpm".into();
        bank.templates.push(bad);
        assert!(matches!(bank.validate(), Err(PracticeError::InvalidTemplate { .. })));
        let kept = bank.sanitized().unwrap();
        assert_eq!(kept.templates.len(), 1);
        assert_eq!(kept.templates[0].id, "tender-shuttle");
    }

    #[test]
    fn missing_required_input_is_invalid() {
        let mut bank = Bank::builtin();
        bank.templates[0].parts[1].uses.tank_gallons = None;
        let err = bank.validate().unwrap_err();
        assert!(err.to_string().contains("tankGallons"));
    }

    #[test]
    fn mismatched_answer_type_is_invalid() {
        let mut bank = Bank::builtin();
        bank.templates[0].parts[2].answer_type = Some(AnswerType::Number);
        assert!(bank.validate().is_err());
    }

    #[test]
    fn load_falls_back_on_missing_file() {
        let bank = load_bank(Path::new("/definitely/not/here/bank.json"));
        assert_eq!(bank, Bank::builtin());
        assert!(try_load_bank(Path::new("/definitely/not/here/bank.json")).is_err());
    }
}
