//! Grading of typed answers.

use crate::answer::{Expected, YesNo};
use crate::question::Question;
use serde::{Deserialize, Serialize};

/// Slack for float noise when a guess sits exactly on the tolerance edge.
const EDGE_EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeStatus {
    Correct,
    Incorrect,
    /// Not a number, or not a Y/N; the user should retry.
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartGrade {
    pub status: GradeStatus,
    pub expected: Expected,
    /// Parsed numeric response, when there was one.
    pub given: Option<f64>,
    pub given_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeReport {
    pub parts: Vec<PartGrade>,
}

impl GradeReport {
    /// Every part correct.
    pub fn all_correct(&self) -> bool {
        !self.parts.is_empty() && self.parts.iter().all(|p| p.status == GradeStatus::Correct)
    }

    pub fn has_invalid(&self) -> bool {
        self.parts.iter().any(|p| p.status == GradeStatus::Invalid)
    }

    pub fn correct_count(&self) -> usize {
        self.parts.iter().filter(|p| p.status == GradeStatus::Correct).count()
    }
}

/// Lenient numeric parse: `"156"`, `" 156 psi "`, `"1,200 gpm"`.
pub fn parse_number(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    let numeric_end = trimmed
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || c == ',' || ((c == '-' || c == '+') && i == 0)))
        .map_or(trimmed.len(), |(i, _)| i);
    let (number, suffix) = trimmed.split_at(numeric_end);
    if !suffix.trim().chars().all(|c| c.is_alphabetic() || c == '/' || c == '.') {
        return None;
    }
    let cleaned: String = number.chars().filter(|&c| c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// First non-space letter, `Y` or `N`, case-insensitive.
pub fn parse_yes_no(input: &str) -> Option<YesNo> {
    match input.trim().chars().next()?.to_ascii_uppercase() {
        'Y' => Some(YesNo::Yes),
        'N' => Some(YesNo::No),
        _ => None,
    }
}

pub fn grade_part(expected: &Expected, input: &str) -> PartGrade {
    let (status, given) = match expected {
        Expected::Number { value, tolerance, .. } => match parse_number(input) {
            Some(v) if (v - value).abs() <= tolerance + EDGE_EPS => (GradeStatus::Correct, Some(v)),
            Some(v) => (GradeStatus::Incorrect, Some(v)),
            None => (GradeStatus::Invalid, None),
        },
        Expected::YesNo { answer } => match parse_yes_no(input) {
            Some(yn) if yn == *answer => (GradeStatus::Correct, None),
            Some(_) => (GradeStatus::Incorrect, None),
            None => (GradeStatus::Invalid, None),
        },
    };
    PartGrade {
        status,
        expected: expected.clone(),
        given,
        given_text: input.to_string(),
    }
}

/// Grade responses in part order. Missing responses are invalid.
pub fn grade<S: AsRef<str>>(question: &Question, answers: &[S]) -> GradeReport {
    let parts = question
        .expected_parts()
        .into_iter()
        .enumerate()
        .map(|(i, expected)| grade_part(expected, answers.get(i).map_or("", |a| a.as_ref())))
        .collect();
    GradeReport { parts }
}
