//! Google Gemini provider implementation for Parley
//!
//! Talks to the Generative Language REST API (`models/{model}:generateContent`).
//! System turns are lifted into `systemInstruction`; every other turn goes
//! into `contents`, with the assistant role mapped to Gemini's `model` role.

use crate::config::{GeminiConfig, GenerationConfig};
use crate::error::{ParleyError, Result};
use crate::providers::{CompletionResponse, Message, Provider, TokenUsage};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Public Generative Language API endpoint
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Gemini API provider
///
/// # Examples
///
/// ```no_run
/// use parley::config::{GeminiConfig, GenerationConfig};
/// use parley::providers::{GeminiProvider, Message, Provider};
///
/// # async fn example() -> parley::error::Result<()> {
/// let provider = GeminiProvider::new(GeminiConfig::default(), "api-key".to_string())?;
/// let reply = provider
///     .complete(&[Message::user("Hello!")], &GenerationConfig::default())
///     .await?;
/// println!("{}", reply.into_text());
/// # Ok(())
/// # }
/// ```
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
    api_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsage>,
    #[serde(default)]
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GeminiProvider {
    /// Create a new Gemini provider instance
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: GeminiConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("parley/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ParleyError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized Gemini provider: model={}, api_base={}",
            config.model,
            config.api_base.as_deref().unwrap_or(DEFAULT_GEMINI_API_BASE)
        );

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        let base = self
            .config
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_GEMINI_API_BASE)
            .trim_end_matches('/');
        format!("{}/v1beta/models/{}:generateContent", base, self.config.model)
    }

    fn build_request(
        &self,
        messages: &[Message],
        params: &GenerationConfig,
    ) -> GenerateContentRequest {
        let system_text = messages
            .iter()
            .filter(|m| m.is_system())
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let system_instruction = (!system_text.is_empty()).then(|| GeminiContent {
            role: None,
            parts: vec![GeminiPart { text: system_text }],
        });

        let contents = messages
            .iter()
            .filter(|m| !m.is_system())
            .map(|m| GeminiContent {
                role: Some(if m.role == "assistant" {
                    "model".to_string()
                } else {
                    "user".to_string()
                }),
                parts: vec![GeminiPart {
                    text: m.content.clone(),
                }],
            })
            .collect();

        GenerateContentRequest {
            system_instruction,
            contents,
            generation_config: GeminiGenerationConfig {
                temperature: params.temperature,
                max_output_tokens: params.max_output_tokens,
            },
        }
    }
}

/// Concatenate the text parts of the first candidate
///
/// `None` only when there is no candidate content at all; an empty reply
/// is still a reply.
fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    let content = response.candidates.first()?.content.as_ref()?;
    Some(content.parts.iter().map(|p| p.text.as_str()).collect())
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn complete(
        &self,
        messages: &[Message],
        params: &GenerationConfig,
    ) -> Result<CompletionResponse> {
        let url = self.endpoint();
        let request = self.build_request(messages, params);

        tracing::debug!(
            "Sending Gemini request: model={}, {} content turns",
            self.config.model,
            request.contents.len()
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Gemini request failed: {}", e);
                ParleyError::Provider(format!("Gemini request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini returned error {}: {}", status, error_text);
            return Err(ParleyError::Provider(format!(
                "Gemini returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            ParleyError::Provider(format!("Failed to parse Gemini response: {}", e))
        })?;

        let text = match extract_text(&body) {
            Some(text) => text,
            None => {
                let reason = body
                    .prompt_feedback
                    .as_ref()
                    .and_then(|f| f.block_reason.clone())
                    .or_else(|| body.candidates.first().and_then(|c| c.finish_reason.clone()))
                    .unwrap_or_else(|| "no candidates returned".to_string());
                tracing::warn!("Gemini returned no text: {}", reason);
                return Err(
                    ParleyError::Provider(format!("Gemini returned no text: {}", reason)).into(),
                );
            }
        };

        let message = Message::assistant(text);
        let response = match body.usage_metadata {
            Some(usage) => {
                tracing::debug!(
                    "Gemini usage: prompt_tokens={}, completion_tokens={}",
                    usage.prompt_token_count,
                    usage.candidates_token_count
                );
                CompletionResponse::with_usage(
                    message,
                    TokenUsage::new(usage.prompt_token_count, usage.candidates_token_count),
                )
            }
            None => CompletionResponse::new(message),
        };

        Ok(response)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
