//! Authentication gateway
//!
//! Login and registration sit behind the [`AuthGateway`] trait. Two
//! implementations exist: [`StubAuth`], which accepts any non-empty
//! credentials, and [`RemoteAuth`], which forwards to an HTTP API.
//! Neither retries, refreshes or revokes tokens.

pub mod remote;
pub mod stub;

pub use remote::RemoteAuth;
pub use stub::StubAuth;

use crate::config::{AuthConfig, AuthMode};
use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// HTTP status that signals a successful registration
pub const REGISTER_SUCCESS_STATUS: u16 = 201;

/// Result of a registration attempt
///
/// `status_code` is the HTTP status returned by the backend, or `0` when
/// the request never got a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterOutcome {
    /// HTTP status (0 for transport failures)
    pub status_code: u16,
    /// Human-readable message from the backend or the transport error
    pub message: String,
}

impl RegisterOutcome {
    /// Build an outcome
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }

    /// Registration succeeded iff the status is exactly 201
    pub fn is_success(&self) -> bool {
        self.status_code == REGISTER_SUCCESS_STATUS
    }
}

/// Login/registration backend
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchange credentials for an access token
    ///
    /// Returns `None` on any failure; callers do not distinguish causes.
    async fn login(&self, email: &str, password: &str) -> Option<String>;

    /// Create an account
    async fn register(&self, username: &str, email: &str, password: &str) -> RegisterOutcome;
}

/// Build the gateway selected by `config.mode`
///
/// # Errors
///
/// Returns error if the remote gateway's HTTP client cannot be built
pub fn create_auth_gateway(config: &AuthConfig) -> Result<Arc<dyn AuthGateway>> {
    tracing::info!("Using {} authentication", config.mode);
    match config.mode {
        AuthMode::Stub => Ok(Arc::new(StubAuth)),
        AuthMode::Remote => Ok(Arc::new(RemoteAuth::new(&config.base_url)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_outcome_success_is_exactly_201() {
        assert!(RegisterOutcome::new(201, "created").is_success());
        assert!(!RegisterOutcome::new(200, "ok").is_success());
        assert!(!RegisterOutcome::new(0, "connection refused").is_success());
    }

    #[tokio::test]
    async fn test_create_stub_gateway() {
        let gateway = create_auth_gateway(&AuthConfig::default()).unwrap();
        assert_eq!(
            gateway.login("user@x.com", "pw").await,
            Some(stub::DEMO_TOKEN.to_string())
        );
    }

    #[test]
    fn test_create_remote_gateway() {
        let config = AuthConfig {
            mode: AuthMode::Remote,
            base_url: "https://auth.example.com/api".to_string(),
            require_confirmation: true,
        };
        assert!(create_auth_gateway(&config).is_ok());
    }
}
