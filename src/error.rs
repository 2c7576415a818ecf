//! Error types for Parley
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Parley operations
///
/// Covers configuration loading, provider calls, authentication and the
/// startup database probe.
#[derive(Error, Debug)]
pub enum ParleyError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-related errors (API calls, malformed replies, etc.)
    #[error("Provider error: {0}")]
    Provider(String),

    /// A required secret is not present in the environment
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Authentication gateway errors
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// The completion call failed while serving a chat submission
    #[error("Completion failed: {0}")]
    Completion(String),

    /// Startup database probe errors
    #[error("Database error: {0}")]
    Database(String),
}

/// Result type alias for Parley operations
///
/// Uses `anyhow::Error` so callers can attach context while still being
/// able to downcast to [`ParleyError`].
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = ParleyError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_provider_error_display() {
        let error = ParleyError::Provider("API timeout".to_string());
        assert_eq!(error.to_string(), "Provider error: API timeout");
    }

    #[test]
    fn test_missing_credentials_error_display() {
        let error = ParleyError::MissingCredentials("GOOGLE_API_KEY".to_string());
        assert_eq!(error.to_string(), "Missing credentials: GOOGLE_API_KEY");
    }

    #[test]
    fn test_completion_error_display() {
        let error = ParleyError::Completion("backend unavailable".to_string());
        assert_eq!(error.to_string(), "Completion failed: backend unavailable");
    }

    #[test]
    fn test_database_error_display() {
        let error = ParleyError::Database("connection refused".to_string());
        assert_eq!(error.to_string(), "Database error: connection refused");
    }

    #[test]
    fn test_error_downcast_through_anyhow() {
        let result: Result<()> = Err(ParleyError::Authentication("no client".to_string()).into());
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ParleyError>(),
            Some(ParleyError::Authentication(_))
        ));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ParleyError>();
    }
}
