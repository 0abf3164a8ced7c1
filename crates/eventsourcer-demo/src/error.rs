//! Eventsourcer demo — application error types.

use eventsourcer_core::error::DomainError;
use thiserror::Error;

/// Startup and runtime errors for the demo runner.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable holds an unsupported value.
    #[error("configuration error: {0}")]
    Config(String),

    /// A command, replay or store operation failed.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_domain_error_converts_into_app_error() {
        // Arrange
        let id = Uuid::new_v4();

        // Act
        let err = AppError::from(DomainError::AggregateNotFound(id));

        // Assert
        assert!(matches!(
            err,
            AppError::Domain(DomainError::AggregateNotFound(missing)) if missing == id
        ));
        assert_eq!(err.to_string(), format!("domain error: aggregate not found: {id}"));
    }

    #[test]
    fn test_config_error_message_names_the_problem() {
        let err = AppError::Config("LOG_FORMAT must be json or pretty".into());
        assert_eq!(
            err.to_string(),
            "configuration error: LOG_FORMAT must be json or pretty"
        );
    }
}
