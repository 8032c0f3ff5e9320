//! Error types for literacy-core.

use thiserror::Error;

/// Result type alias using ContentError.
pub type Result<T> = std::result::Result<T, ContentError>;

/// Errors surfaced by classification, matching and search.
///
/// An empty sample is never an error; only storage failures and
/// malformed input end up here.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("repository error: {0}")]
    Repository(String),

    #[error("invalid token pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("unknown content type: {0}")]
    UnknownContentType(String),

    #[error("unknown level: {0}")]
    UnknownLevel(String),

    #[error("unknown complexity level: {0}")]
    UnknownComplexity(String),

    #[error("text metrics unavailable: {0}")]
    Metrics(String),
}

impl ContentError {
    /// Whether the error comes from caller input rather than storage.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidPattern(_)
                | Self::UnknownContentType(_)
                | Self::UnknownLevel(_)
                | Self::UnknownComplexity(_)
        )
    }
}
