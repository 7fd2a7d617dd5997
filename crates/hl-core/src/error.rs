use thiserror::Error;

pub type HlResult<T> = Result<T, HlError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HlError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Negative value for {what}: {value}")]
    Negative { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Nothing to pick from: {what}")]
    EmptyChoice { what: &'static str },
}
