//! Completion gateway
//!
//! Turns a question into the two-turn prompt, sends it to the configured
//! provider with the configured sampling parameters, and hands back the
//! reply text unchanged. Each call is one fresh round trip.

use std::sync::Arc;

use crate::config::{Config, GenerationConfig};
use crate::error::{ParleyError, Result};
use crate::prompts::PromptTemplate;
use crate::providers::Provider;

/// Stateless adapter between a question and a completion backend
#[derive(Clone)]
pub struct CompletionGateway {
    provider: Arc<dyn Provider>,
    template: PromptTemplate,
    params: GenerationConfig,
}

impl CompletionGateway {
    /// Build a gateway around a provider
    pub fn new(
        provider: Arc<dyn Provider>,
        template: PromptTemplate,
        params: GenerationConfig,
    ) -> Self {
        Self {
            provider,
            template,
            params,
        }
    }

    /// Build a gateway using the prompt and generation sections of `config`
    pub fn from_config(provider: Arc<dyn Provider>, config: &Config) -> Self {
        Self::new(
            provider,
            PromptTemplate::from(&config.prompt),
            config.generation,
        )
    }

    /// Ask the model a question and return its reply verbatim
    ///
    /// # Errors
    ///
    /// Returns `ParleyError::Completion` wrapping the provider failure
    pub async fn ask(&self, question: &str) -> Result<String> {
        let messages = self.template.render(question);
        tracing::debug!(
            provider = self.provider.name(),
            model = self.provider.model(),
            question_len = question.len(),
            "Sending completion request"
        );

        let response = self
            .provider
            .complete(&messages, &self.params)
            .await
            .map_err(|e| ParleyError::Completion(e.to_string()))?;

        if let Some(usage) = response.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Completion finished"
            );
        }

        Ok(response.into_text())
    }
}
