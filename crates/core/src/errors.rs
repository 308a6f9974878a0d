//! Core error types for the round calculator.
//!
//! Only conditions that stop a whole operation live here. Per-round and
//! per-company problems are recovered locally and reported as
//! [`CalculationWarning`](crate::calculation::CalculationWarning)s instead.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the round calculator.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("CSV processing failed: {0}")]
    Csv(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Required column '{0}' is missing")]
    MissingColumn(String),
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err.to_string())
    }
}
