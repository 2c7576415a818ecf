//! Provider module for Parley
//!
//! This module contains the completion backend abstraction and
//! implementations for Google Gemini and Ollama.

pub mod base;
pub mod gemini;
pub mod ollama;

pub use base::{CompletionResponse, Message, Provider, TokenUsage};
pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;

use crate::config::{ProviderConfig, Secrets};
use crate::error::{ParleyError, Result};
use std::sync::Arc;

/// Create a provider instance based on configuration
///
/// # Arguments
///
/// * `config` - Provider configuration
/// * `secrets` - Secrets resolved from the environment
///
/// # Errors
///
/// Returns error if the provider type is unknown, a required credential is
/// missing, or HTTP client initialization fails
pub fn create_provider(config: &ProviderConfig, secrets: &Secrets) -> Result<Arc<dyn Provider>> {
    match config.provider_type.as_str() {
        "gemini" => {
            let api_key = secrets.google_api_key.clone().ok_or_else(|| {
                ParleyError::MissingCredentials(crate::config::GOOGLE_API_KEY_VAR.to_string())
            })?;
            Ok(Arc::new(GeminiProvider::new(config.gemini.clone(), api_key)?))
        }
        "ollama" => Ok(Arc::new(OllamaProvider::new(config.ollama.clone())?)),
        other => Err(ParleyError::Provider(format!("Unknown provider type: {}", other)).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secrets_with_key() -> Secrets {
        Secrets {
            google_api_key: Some("key".to_string()),
        }
    }

    #[test]
    fn test_create_provider_invalid_type() {
        let config = ProviderConfig {
            provider_type: "invalid".to_string(),
            ..ProviderConfig::default()
        };

        let result = create_provider(&config, &secrets_with_key());
        let err = result.err().unwrap();
        assert!(err.to_string().contains("Unknown provider type"));
    }

    #[test]
    fn test_create_gemini_provider() {
        let provider = create_provider(&ProviderConfig::default(), &secrets_with_key()).unwrap();
        assert_eq!(provider.name(), "gemini");
        assert_eq!(provider.model(), "gemini-1.5-flash");
    }

    #[test]
    fn test_create_gemini_provider_without_key() {
        let result = create_provider(&ProviderConfig::default(), &Secrets::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_create_ollama_provider_without_key() {
        let config = ProviderConfig {
            provider_type: "ollama".to_string(),
            ..ProviderConfig::default()
        };
        let provider = create_provider(&config, &Secrets::default()).unwrap();
        assert_eq!(provider.name(), "ollama");
    }
}
