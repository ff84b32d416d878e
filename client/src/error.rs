//! Unified error handling for the client.

use crate::config::ConfigError;
use roster_engine::RecordId;

/// Failure of a persistence call.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found in store: {0}")]
    NotFound(RecordId),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid store URL: {0}")]
    InvalidUrl(String),

    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed stored data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("injected failure: {0}")]
    Injected(String),
}

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Validation and not-found errors, resolved before the store is touched
    #[error("{0}")]
    Engine(#[from] roster_engine::Error),

    /// The store call failed; memory was left unchanged
    #[error("Persistence failure: {0}")]
    Persistence(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// True for missing-field errors reported inline to the user.
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Engine(e) if e.is_validation())
    }

    /// True when the referenced record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::Engine(roster_engine::Error::RecordNotFound(_))
                | AppError::Persistence(StoreError::NotFound(_))
        )
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, AppError::Persistence(_))
    }
}

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        let err: AppError = roster_engine::Error::MissingRequiredField("name".into()).into();
        assert!(err.is_validation());
        assert!(!err.is_persistence());

        let err: AppError = roster_engine::Error::RecordNotFound("s_1".into()).into();
        assert!(err.is_not_found());

        let err: AppError = StoreError::Injected("disk full".into()).into();
        assert!(err.is_persistence());
        assert_eq!(
            err.to_string(),
            "Persistence failure: injected failure: disk full"
        );
    }

    #[test]
    fn startup_errors_convert() {
        let err: AppError = ConfigError::InvalidPageSize("0".into()).into();
        assert!(matches!(err, AppError::Config(_)));
        assert!(!err.is_persistence());

        let err: AppError = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed").into();
        assert!(matches!(err, AppError::Io(_)));
    }
}
