//! Practice questions.

use crate::adjust::Adjustment;
use crate::answer::{Expected, Unit};
use crate::bank_eval::Part;
use hl_hydraulics::{Derived, Scenario, ScenarioKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A composed question. Immutable once built; grading only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub scenario: Scenario,
    pub prompt: String,
    pub kind: QuestionKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "qKind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionKind {
    /// Pump pressure for the layout as drawn.
    Pp { expected: Expected },
    /// Pump pressure after one change to a copy of the layout.
    Adjust {
        adjustment: Adjustment,
        adjusted: Scenario,
        expected: Expected,
    },
    /// An intermediate value instead of the final PDP.
    Reverse {
        target: ReverseTarget,
        expected: Expected,
    },
    /// Can the pump stay within a fixed limit.
    Check { limit_psi: f64, expected: Expected },
    /// Bank template with ordered parts.
    Multi {
        template_id: String,
        chip: Option<String>,
        reveal_lead: Option<String>,
        parts: Vec<Part>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QKind {
    Pp,
    Adjust,
    Reverse,
    Check,
    Multi,
}

impl QKind {
    pub fn label(self) -> &'static str {
        match self {
            QKind::Pp => "PP",
            QKind::Adjust => "ADJUST",
            QKind::Reverse => "REVERSE",
            QKind::Check => "CHECK",
            QKind::Multi => "MULTI",
        }
    }
}

impl fmt::Display for QKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Question {
    pub fn q_kind(&self) -> QKind {
        match &self.kind {
            QuestionKind::Pp { .. } => QKind::Pp,
            QuestionKind::Adjust { .. } => QKind::Adjust,
            QuestionKind::Reverse { .. } => QKind::Reverse,
            QuestionKind::Check { .. } => QKind::Check,
            QuestionKind::Multi { .. } => QKind::Multi,
        }
    }

    /// The layout the expected answer was computed on.
    pub fn answered_scenario(&self) -> &Scenario {
        match &self.kind {
            QuestionKind::Adjust { adjusted, .. } => adjusted,
            _ => &self.scenario,
        }
    }

    /// Expected answers in the order responses are submitted.
    pub fn expected_parts(&self) -> Vec<&Expected> {
        match &self.kind {
            QuestionKind::Pp { expected }
            | QuestionKind::Adjust { expected, .. }
            | QuestionKind::Reverse { expected, .. }
            | QuestionKind::Check { expected, .. } => vec![expected],
            QuestionKind::Multi { parts, .. } => parts.iter().map(|p| &p.expected).collect(),
        }
    }

    pub fn part_count(&self) -> usize {
        match &self.kind {
            QuestionKind::Multi { parts, .. } => parts.len(),
            _ => 1,
        }
    }

    /// Per-part prompts for multi-part questions; empty otherwise.
    pub fn part_prompts(&self) -> Vec<&str> {
        match &self.kind {
            QuestionKind::Multi { parts, .. } => parts.iter().map(|p| p.prompt.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

/// Intermediate quantities a reverse question can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReverseTarget {
    MainFrictionLoss,
    TotalFlow,
    HigherBranchNeed,
    PerLineFlow,
    PerLineFrictionLoss,
}

const SINGLE_TARGETS: [ReverseTarget; 1] = [ReverseTarget::MainFrictionLoss];
const WYE_TARGETS: [ReverseTarget; 3] = [
    ReverseTarget::TotalFlow,
    ReverseTarget::MainFrictionLoss,
    ReverseTarget::HigherBranchNeed,
];
const MASTER_TARGETS: [ReverseTarget; 2] =
    [ReverseTarget::PerLineFlow, ReverseTarget::PerLineFrictionLoss];

impl ReverseTarget {
    pub fn candidates(kind: ScenarioKind) -> &'static [ReverseTarget] {
        match kind {
            ScenarioKind::Single => &SINGLE_TARGETS,
            ScenarioKind::Wye2 => &WYE_TARGETS,
            ScenarioKind::Master => &MASTER_TARGETS,
        }
    }

    pub fn unit(self) -> Unit {
        match self {
            ReverseTarget::TotalFlow | ReverseTarget::PerLineFlow => Unit::Gpm,
            ReverseTarget::MainFrictionLoss
            | ReverseTarget::HigherBranchNeed
            | ReverseTarget::PerLineFrictionLoss => Unit::Psi,
        }
    }

    /// Unrounded value read from the derived hydraulics.
    pub fn value(self, derived: &Derived) -> f64 {
        match self {
            ReverseTarget::MainFrictionLoss | ReverseTarget::PerLineFrictionLoss => {
                derived.main_fl_psi()
            }
            ReverseTarget::TotalFlow => derived.total_flow_gpm,
            ReverseTarget::HigherBranchNeed => derived.higher_need().map_or(0.0, |n| n.need_psi),
            ReverseTarget::PerLineFlow => derived.per_line_gpm().unwrap_or(0.0),
        }
    }

    pub fn ask(self) -> &'static str {
        match self {
            ReverseTarget::MainFrictionLoss => "What is the friction loss in the main line?",
            ReverseTarget::TotalFlow => "What total flow does the main line carry to the wye?",
            ReverseTarget::HigherBranchNeed => {
                "What pressure does the harder branch need at the wye (nozzle pressure plus its friction loss)?"
            }
            ReverseTarget::PerLineFlow => "How much flow does each supply line carry?",
            ReverseTarget::PerLineFrictionLoss => {
                "What is the friction loss in the governing (longer) supply line?"
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReverseTarget::MainFrictionLoss => "main line friction loss",
            ReverseTarget::TotalFlow => "total flow",
            ReverseTarget::HigherBranchNeed => "higher branch need",
            ReverseTarget::PerLineFlow => "flow per supply line",
            ReverseTarget::PerLineFrictionLoss => "supply line friction loss",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hl_hydraulics::{Calculator, Catalog, ElevationRule, Nozzle, SingleLine};

    fn single() -> Scenario {
        Scenario::Single(SingleLine {
            main_diameter: "1.75".into(),
            main_length_ft: 200.0,
            elevation_ft: 0.0,
            nozzle: Nozzle::new("15/16\" smooth bore", 185.0, 50.0),
        })
    }

    #[test]
    fn q_kind_tag_is_screaming_case() {
        let q = Question {
            scenario: single(),
            prompt: "p".into(),
            kind: QuestionKind::Check {
                limit_psi: 150.0,
                expected: Expected::yes_no(false),
            },
        };
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["kind"]["qKind"], "CHECK");
        assert_eq!(q.q_kind(), QKind::Check);
        assert_eq!(q.part_count(), 1);
        let back: Question = serde_json::from_value(json).unwrap();
        assert_eq!(back, q);
    }

    #[test]
    fn reverse_targets_fit_topology() {
        assert_eq!(
            ReverseTarget::candidates(ScenarioKind::Single),
            &[ReverseTarget::MainFrictionLoss]
        );
        assert!(ReverseTarget::candidates(ScenarioKind::Wye2).contains(&ReverseTarget::HigherBranchNeed));
        assert!(ReverseTarget::candidates(ScenarioKind::Master).contains(&ReverseTarget::PerLineFlow));
    }

    #[test]
    fn reverse_value_reads_derived() {
        let catalog = Catalog::standard();
        let calc = Calculator::new(&catalog, ElevationRule::LineEditor);
        let derived = calc.derive(&single());
        let fl = ReverseTarget::MainFrictionLoss.value(&derived);
        assert!((fl - 106.0975).abs() < 1e-9);
        assert_eq!(ReverseTarget::PerLineFlow.value(&derived), 0.0);
    }
}
