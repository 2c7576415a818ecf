//! Demo authentication that never leaves the process

use super::{AuthGateway, RegisterOutcome, REGISTER_SUCCESS_STATUS};
use async_trait::async_trait;

/// Token handed out by the stub gateway
pub const DEMO_TOKEN: &str = "demo_token";

/// Accepts any non-empty credentials
#[derive(Debug, Clone, Copy, Default)]
pub struct StubAuth;

fn filled(values: &[&str]) -> bool {
    values.iter().all(|v| !v.trim().is_empty())
}

#[async_trait]
impl AuthGateway for StubAuth {
    async fn login(&self, email: &str, password: &str) -> Option<String> {
        if filled(&[email, password]) {
            tracing::debug!("Stub login accepted");
            Some(DEMO_TOKEN.to_string())
        } else {
            None
        }
    }

    async fn register(&self, username: &str, email: &str, password: &str) -> RegisterOutcome {
        if filled(&[username, email, password]) {
            RegisterOutcome::new(REGISTER_SUCCESS_STATUS, "Account created")
        } else {
            RegisterOutcome::new(400, "All fields are required")
        }
    }
}
