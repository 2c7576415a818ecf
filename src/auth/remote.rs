//! HTTP-backed authentication
//!
//! `POST {base}/login/` with form fields `email` and `password` must answer
//! 200 with a JSON body carrying `access`. `POST {base}/register/` with
//! `username`, `email` and `password` signals success with 201.

use super::{AuthGateway, RegisterOutcome};
use crate::error::{ParleyError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

/// Remote authentication gateway
pub struct RemoteAuth {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access: String,
}

impl RemoteAuth {
    /// Create a gateway for the API rooted at `base_url`
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("parley/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ParleyError::Authentication(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/{}/", self.base_url, action)
    }
}

#[async_trait]
impl AuthGateway for RemoteAuth {
    async fn login(&self, email: &str, password: &str) -> Option<String> {
        let url = self.endpoint("login");
        tracing::debug!("Sending login request to {}", url);

        let response = match self
            .client
            .post(&url)
            .form(&[("email", email), ("password", password)])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Login request failed: {}", e);
                return None;
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!("Login rejected with status {}", status);
            return None;
        }

        match response.json::<LoginResponse>().await {
            Ok(body) => Some(body.access),
            Err(e) => {
                tracing::warn!("Login response missing access token: {}", e);
                None
            }
        }
    }

    async fn register(&self, username: &str, email: &str, password: &str) -> RegisterOutcome {
        let url = self.endpoint("register");
        tracing::debug!("Sending registration request to {}", url);

        let response = match self
            .client
            .post(&url)
            .form(&[
                ("username", username),
                ("email", email),
                ("password", password),
            ])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Registration request failed: {}", e);
                return RegisterOutcome::new(0, e.to_string());
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            status.canonical_reason().unwrap_or("").to_string()
        } else {
            body.trim().to_string()
        };

        if status.as_u16() != super::REGISTER_SUCCESS_STATUS {
            tracing::warn!("Registration rejected with status {}", status);
        }

        RegisterOutcome::new(status.as_u16(), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_appends_trailing_slash() {
        let auth = RemoteAuth::new("https://auth.example.com/api/").unwrap();
        assert_eq!(auth.endpoint("login"), "https://auth.example.com/api/login/");
        assert_eq!(
            auth.endpoint("register"),
            "https://auth.example.com/api/register/"
        );
    }

    #[tokio::test]
    async fn test_login_network_error_is_none() {
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let auth = RemoteAuth::new("http://127.0.0.1:9").unwrap();
        assert!(auth.login("user@x.com", "pw").await.is_none());
    }

    #[tokio::test]
    async fn test_register_network_error_has_status_zero() {
        let auth = RemoteAuth::new("http://127.0.0.1:9").unwrap();
        let outcome = auth.register("alice", "a@x.com", "pw").await;
        assert_eq!(outcome.status_code, 0);
        assert!(!outcome.is_success());
    }
}
