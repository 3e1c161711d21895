use thiserror::Error;

/// Errors surfaced at the fallible edges of the engine (text in, config in).
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("template error: {0}")]
    Template(#[from] templar_core::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Config(String),
}

/// Why a parsed rule is unusable. Rules failing validation degrade to
/// plain generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("negative bound {0}")]
    NegativeBound(i64),
    #[error("min {min} exceeds max {max}")]
    InvertedRange { min: i64, max: i64 },
    #[error("step must be non-zero")]
    ZeroStep,
    #[error("decimal places {0} outside 0..=10")]
    DecimalPlaces(i64),
    #[error("boolean weights must sum to a positive value")]
    ZeroWeight,
    #[error("repeat count {0} exceeds 10000")]
    RepeatLimit(i64),
}

/// Failure to resolve a single `@placeholder`. The resolver substitutes the
/// literal placeholder text for any of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolutionError {
    #[error("unknown placeholder '{0}'")]
    UnknownPlaceholder(String),
    #[error("placeholder '{name}' has no overload taking {arity} argument(s)")]
    ArityMismatch { name: String, arity: usize },
    #[error("placeholder '{name}': {message}")]
    InvalidArgument { name: String, message: String },
    #[error("extension '{name}' failed: {message}")]
    Extension { name: String, message: String },
}

impl ResolutionError {
    pub fn invalid_argument(name: &str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.to_string(),
            message: message.into(),
        }
    }
}
