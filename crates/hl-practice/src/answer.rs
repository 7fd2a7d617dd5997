//! Expected answers and their units.

use hl_core::{round_to, sanitize};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Psi,
    Gpm,
    #[serde(alias = "gal")]
    Gallons,
    #[serde(alias = "min")]
    Minutes,
    #[serde(alias = "tenders")]
    Count,
}

impl Unit {
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Psi => "psi",
            Unit::Gpm => "gpm",
            Unit::Gallons => "gal",
            Unit::Minutes => "min",
            Unit::Count => "",
        }
    }

    /// Presentation rounding applied to expected values.
    pub fn round(self, v: f64) -> f64 {
        match self {
            Unit::Psi | Unit::Gpm | Unit::Gallons => round_to(v, 1.0),
            Unit::Minutes => round_to(v, 0.1),
            Unit::Count => sanitize(v).ceil(),
        }
    }

    /// Grading tolerance given the configured psi tolerance.
    pub fn tolerance(self, psi_tolerance: f64) -> f64 {
        match self {
            Unit::Psi | Unit::Gpm | Unit::Gallons => sanitize(psi_tolerance),
            Unit::Minutes => 1.0,
            Unit::Count => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerType {
    Number,
    #[serde(rename = "yesno", alias = "yn")]
    YesNo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    #[serde(rename = "Y")]
    Yes,
    #[serde(rename = "N")]
    No,
}

impl YesNo {
    pub fn from_bool(yes: bool) -> Self {
        if yes { YesNo::Yes } else { YesNo::No }
    }

    pub fn letter(self) -> char {
        match self {
            YesNo::Yes => 'Y',
            YesNo::No => 'N',
        }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// What a correct response looks like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expected {
    Number {
        /// Rounded value that responses are graded against.
        value: f64,
        /// Unrounded value, kept for explanations.
        exact: f64,
        unit: Unit,
        tolerance: f64,
    },
    YesNo {
        answer: YesNo,
    },
}

impl Expected {
    pub fn number(exact: f64, unit: Unit, psi_tolerance: f64) -> Self {
        Expected::Number {
            value: unit.round(exact),
            exact,
            unit,
            tolerance: unit.tolerance(psi_tolerance),
        }
    }

    pub fn yes_no(yes: bool) -> Self {
        Expected::YesNo {
            answer: YesNo::from_bool(yes),
        }
    }

    pub fn answer_type(&self) -> AnswerType {
        match self {
            Expected::Number { .. } => AnswerType::Number,
            Expected::YesNo { .. } => AnswerType::YesNo,
        }
    }

    pub fn numeric_value(&self) -> Option<f64> {
        match self {
            Expected::Number { value, .. } => Some(*value),
            Expected::YesNo { .. } => None,
        }
    }

    pub fn tolerance(&self) -> f64 {
        match self {
            Expected::Number { tolerance, .. } => *tolerance,
            Expected::YesNo { .. } => 0.0,
        }
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Number { value, unit, .. } => {
                let symbol = unit.symbol();
                if symbol.is_empty() {
                    write!(f, "{}", hl_core::fmt_value(*value))
                } else {
                    write!(f, "{} {}", hl_core::fmt_value(*value), symbol)
                }
            }
            Expected::YesNo { answer } => write!(f, "{answer}"),
        }
    }
}
