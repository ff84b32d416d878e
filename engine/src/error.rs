//! Error types for the roster engine.

use crate::RecordId;
use thiserror::Error;

/// All possible errors from the roster engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Validation errors
    #[error("missing required field: {0}")]
    MissingRequiredField(String),

    #[error("invalid sort spec: {0}")]
    InvalidSortSpec(String),

    // Record set errors
    #[error("record not found: {0}")]
    RecordNotFound(RecordId),

    #[error("record already exists: {0}")]
    RecordAlreadyExists(RecordId),
}

impl Error {
    /// Whether this error came from payload validation.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::MissingRequiredField(_) | Error::InvalidSortSpec(_)
        )
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::RecordNotFound("s_1".into());
        assert_eq!(err.to_string(), "record not found: s_1");

        let err = Error::MissingRequiredField("email".into());
        assert_eq!(err.to_string(), "missing required field: email");

        let err = Error::InvalidSortSpec("age_up".into());
        assert_eq!(err.to_string(), "invalid sort spec: age_up");
    }

    #[test]
    fn validation_classification() {
        assert!(Error::MissingRequiredField("name".into()).is_validation());
        assert!(!Error::RecordNotFound("s_1".into()).is_validation());
        assert!(!Error::RecordAlreadyExists("s_1".into()).is_validation());
    }
}
