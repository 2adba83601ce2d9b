use thiserror::Error;

/// Error type that captures common planning failures.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Forecast transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid reference: {0}")]
    InvalidRef(String),
}
