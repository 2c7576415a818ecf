//! Prompt templates for the completion gateway
//!
//! A prompt is two turns: a fixed system instruction and a user turn built
//! by substituting the question into a template.

use crate::config::{PromptConfig, QUESTION_PLACEHOLDER};
use crate::providers::Message;

/// Two-turn prompt template
///
/// # Examples
///
/// ```
/// use parley::prompts::PromptTemplate;
///
/// let template = PromptTemplate::default();
/// let messages = template.render("What is Rust?");
/// assert_eq!(messages.len(), 2);
/// assert_eq!(messages[0].role, "system");
/// assert_eq!(messages[1].content, "Question: What is Rust?");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    system: String,
    user: String,
}

impl PromptTemplate {
    /// Build a template from a system instruction and a user template
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// The system instruction
    pub fn system(&self) -> &str {
        &self.system
    }

    /// Substitute the question into the user template
    ///
    /// Only `{question}` is replaced; any other brace text is kept verbatim.
    pub fn user_turn(&self, question: &str) -> String {
        self.user.replace(QUESTION_PLACEHOLDER, question)
    }

    /// Render the full prompt for a question
    pub fn render(&self, question: &str) -> Vec<Message> {
        vec![
            Message::system(self.system.clone()),
            Message::user(self.user_turn(question)),
        ]
    }
}

impl From<&PromptConfig> for PromptTemplate {
    fn from(config: &PromptConfig) -> Self {
        Self::new(config.system.clone(), config.user.clone())
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::from(&PromptConfig::default())
    }
}
