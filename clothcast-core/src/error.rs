use thiserror::Error;

/// Failures surfaced by the weather fetcher and the request boundary.
///
/// Each variant carries the human-readable message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClothcastError {
    /// Required provider credential is missing or the client cannot be built.
    #[error("{0}")]
    Configuration(String),

    /// The location did not resolve to any geographic match.
    #[error("{0}")]
    NotFound(String),

    /// A provider call failed, timed out, or returned an unusable body.
    #[error("{0}")]
    Upstream(String),

    /// Malformed input rejected before it reaches the engine.
    #[error("{0}")]
    Validation(String),
}

impl ClothcastError {
    pub fn kind(&self) -> &'static str {
        match self {
            ClothcastError::Configuration(_) => "configuration",
            ClothcastError::NotFound(_) => "not_found",
            ClothcastError::Upstream(_) => "upstream",
            ClothcastError::Validation(_) => "validation",
        }
    }

    /// Only upstream failures are worth retrying with the same input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClothcastError::Upstream(_))
    }
}
