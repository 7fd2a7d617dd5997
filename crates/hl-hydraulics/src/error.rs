//! Error types for catalog handling.
//!
//! Hydraulic arithmetic itself never fails; invalid numbers degrade to 0.

use hl_core::HlError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HydraulicsError {
    #[error("Invalid catalog value: {0}")]
    Value(#[from] HlError),

    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Unknown hose diameter '{diameter}' referenced by {context}")]
    UnknownDiameter { diameter: String, context: String },

    #[error("Catalog is missing {what}")]
    Missing { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type HydraulicsResult<T> = Result<T, HydraulicsError>;
