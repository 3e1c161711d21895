use thiserror::Error;

/// Core error type shared across templar crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The template text is not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// The template parsed but cannot be used as a template.
    #[error("invalid template: {0}")]
    InvalidTemplate(String),
}

/// Convenience alias for results returned by templar crates.
pub type Result<T> = std::result::Result<T, Error>;
