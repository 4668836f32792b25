//! Error types for loading and validating projection inputs
//!
//! The projection engine itself is infallible. Errors only arise at the
//! edges: reading contribution schedules, parsing requests, validating steps.

use thiserror::Error;

/// Result alias for fallible input handling
pub type Result<T> = std::result::Result<T, ProjectionError>;

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Frequency label that is not one of the known schedule frequencies
    #[error("unknown contribution frequency: {0}")]
    UnknownFrequency(String),

    #[error("invalid {field} date '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },

    /// Step amount that is negative, NaN or infinite
    #[error("contribution step {index} has invalid amount {amount}")]
    InvalidAmount { index: usize, amount: f64 },

    #[error("contribution step {index} ends ({end}) before it starts ({start})")]
    InvertedStep {
        index: usize,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
}
