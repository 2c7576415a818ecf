//! Base provider trait and common types for Parley
//!
//! This module defines the Provider trait that every completion backend
//! implements, along with the prompt message and response types shared
//! by the backends.

use crate::config::GenerationConfig;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single prompt turn sent to a completion backend
///
/// Roles are plain strings on the wire ("system", "user", "assistant");
/// the constructors below are the only way the crate builds them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender (system, user, assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use parley::providers::Message;
    ///
    /// let msg = Message::user("Hello, assistant!");
    /// assert_eq!(msg.role, "user");
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new assistant message
    ///
    /// # Examples
    ///
    /// ```
    /// use parley::providers::Message;
    ///
    /// let msg = Message::assistant("Hello, user!");
    /// assert_eq!(msg.role, "assistant");
    /// ```
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new system message
    ///
    /// # Examples
    ///
    /// ```
    /// use parley::providers::Message;
    ///
    /// let msg = Message::system("You are a helpful assistant");
    /// assert_eq!(msg.role, "system");
    /// ```
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Returns true for system-role messages
    pub fn is_system(&self) -> bool {
        self.role == "system"
    }
}

/// Token usage information from a completion
///
/// Tracks the number of tokens used in prompts and completions,
/// as reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: usize,
    /// Number of tokens in the completion
    pub completion_tokens: usize,
    /// Total tokens used (prompt + completion)
    pub total_tokens: usize,
}

impl TokenUsage {
    /// Create a new TokenUsage instance
    ///
    /// # Examples
    ///
    /// ```
    /// use parley::providers::TokenUsage;
    ///
    /// let usage = TokenUsage::new(100, 50);
    /// assert_eq!(usage.total_tokens, 150);
    /// ```
    pub fn new(prompt_tokens: usize, completion_tokens: usize) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Completion response with message and optional token usage
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// The response message from the model
    pub message: Message,
    /// Optional token usage information
    pub usage: Option<TokenUsage>,
}

impl CompletionResponse {
    /// Create a new CompletionResponse
    pub fn new(message: Message) -> Self {
        Self {
            message,
            usage: None,
        }
    }

    /// Create a new CompletionResponse with token usage
    pub fn with_usage(message: Message, usage: TokenUsage) -> Self {
        Self {
            message,
            usage: Some(usage),
        }
    }

    /// The reply text, consuming the response
    pub fn into_text(self) -> String {
        self.message.content
    }
}

/// Provider trait for completion backends
///
/// Implementations send the given prompt turns to their backend with the
/// supplied sampling parameters and return the model's reply. Calls are
/// single round trips without retries.
///
/// # Examples
///
/// ```no_run
/// use parley::config::GenerationConfig;
/// use parley::providers::{CompletionResponse, Message, Provider};
/// use parley::error::Result;
/// use async_trait::async_trait;
///
/// struct EchoProvider;
///
/// #[async_trait]
/// impl Provider for EchoProvider {
///     async fn complete(
///         &self,
///         messages: &[Message],
///         _params: &GenerationConfig,
///     ) -> Result<CompletionResponse> {
///         let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
///         Ok(CompletionResponse::new(Message::assistant(last)))
///     }
///
///     fn model(&self) -> &str {
///         "echo"
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Completes a conversation with the given prompt turns
    ///
    /// # Errors
    ///
    /// Returns error if the API call fails or the response is invalid
    async fn complete(
        &self,
        messages: &[Message],
        params: &GenerationConfig,
    ) -> Result<CompletionResponse>;

    /// Short backend name used in logs
    fn name(&self) -> &'static str {
        "custom"
    }

    /// Model the backend is asked to run
    fn model(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        assert_eq!(Message::user("Hello").role, "user");
        assert_eq!(Message::assistant("Hi there").role, "assistant");
        let system = Message::system("System prompt");
        assert!(system.is_system());
        assert_eq!(system.content, "System prompt");
    }

    #[test]
    fn test_message_serialization() {
        let json = serde_json::to_value(Message::user("Hello")).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "Hello");
    }

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage::new(12, 30);
        assert_eq!(usage.total_tokens, 42);
    }

    #[test]
    fn test_completion_response_into_text() {
        let usage = TokenUsage::new(1, 2);
        let response = CompletionResponse::with_usage(Message::assistant("answer"), usage);
        assert_eq!(response.usage, Some(usage));
        assert_eq!(response.into_text(), "answer");
    }

    #[test]
    fn test_default_provider_name() {
        struct Silent;

        #[async_trait]
        impl Provider for Silent {
            async fn complete(
                &self,
                _messages: &[Message],
                _params: &GenerationConfig,
            ) -> Result<CompletionResponse> {
                Ok(CompletionResponse::new(Message::assistant("")))
            }

            fn model(&self) -> &str {
                "silent-1"
            }
        }

        assert_eq!(Silent.model(), "silent-1");
        assert_eq!(Silent.name(), "custom");
    }
}
