//! Error types for practice generation, bank loading and sessions.

use hl_core::HlError;
use hl_hydraulics::HydraulicsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PracticeError {
    #[error("Random choice failed: {0}")]
    Choice(#[from] HlError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] HydraulicsError),

    #[error("Catalog has no {what}")]
    EmptyCatalog { what: String },

    #[error("Bank has no templates usable for {kind} scenarios")]
    NoApplicableTemplate { kind: &'static str },

    #[error("Invalid bank template '{id}': {reason}")]
    InvalidTemplate { id: String, reason: String },

    #[error("Invalid bank: {reason}")]
    InvalidBank { reason: String },

    #[error("Unknown answer key '{key}'")]
    UnknownAnswerKey { key: String },

    #[error("Invalid config: {what}")]
    Config { what: String },

    #[error("No question in progress")]
    NoActiveQuestion,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PracticeResult<T> = Result<T, PracticeError>;
