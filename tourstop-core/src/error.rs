//! Error types for tourstop.

use thiserror::Error;

/// Errors that can occur in tourstop operations.
#[derive(Error, Debug)]
pub enum TourError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid catalog: {0}")]
    Catalog(String),

    #[error("Event not found: {0}")]
    EventNotFound(u32),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Required request fields that were empty after trimming.
    #[error("Please complete name, email, and university")]
    MissingFields(Vec<&'static str>),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl TourError {
    /// Short machine-friendly description, e.g. "Missing: name, email".
    pub fn detail(&self) -> String {
        match self {
            TourError::MissingFields(fields) => format!("Missing: {}", fields.join(", ")),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for TourError {
    fn from(err: serde_json::Error) -> Self {
        TourError::Serialization(err.to_string())
    }
}

/// Result type alias for tourstop operations.
pub type TourResult<T> = Result<T, TourError>;
