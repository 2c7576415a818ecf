//! Configuration management for Parley
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//! Secrets are never read from the configuration file; see [`Secrets`].

use crate::error::{ParleyError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable holding the Gemini API key
pub const GOOGLE_API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Environment variable holding the optional database connection string
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Placeholder substituted with the user's question in the prompt template
pub const QUESTION_PLACEHOLDER: &str = "{question}";

/// Main configuration structure for Parley
///
/// Every section has defaults, so an empty file (or no file at all) yields
/// a working stub-auth setup against Gemini.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Completion provider selection and settings
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Sampling parameters sent with every completion call
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Two-turn prompt template
    #[serde(default)]
    pub prompt: PromptConfig,
    /// Login/registration gateway settings
    #[serde(default)]
    pub auth: AuthConfig,
    /// Chat page behaviour
    #[serde(default)]
    pub chat: ChatConfig,
    /// Page titles and captions
    #[serde(default)]
    pub ui: UiConfig,
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Optional startup database probe
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Provider configuration
///
/// Specifies which completion backend to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use ("gemini" or "ollama")
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// Google Gemini configuration
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Ollama configuration
    #[serde(default)]
    pub ollama: OllamaConfig,
}

fn default_provider_type() -> String {
    "gemini".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            gemini: GeminiConfig::default(),
            ollama: OllamaConfig::default(),
        }
    }
}

/// Google Gemini provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Model to use for Gemini
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Optional API base URL (useful for tests and local mocks)
    ///
    /// When unset, the public Generative Language endpoint is used.
    #[serde(default)]
    pub api_base: Option<String>,
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            api_base: None,
        }
    }
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model to use for Ollama
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:latest".to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
        }
    }
}

/// Sampling parameters for completion calls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum number of tokens the model may produce
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_output_tokens() -> u32 {
    2048
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

/// Prompt template configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// System instruction sent as the first turn
    #[serde(default = "default_system_prompt")]
    pub system: String,

    /// User turn template; must contain `{question}`
    #[serde(default = "default_user_template")]
    pub user: String,
}

fn default_system_prompt() -> String {
    "You are a friendly AI assistant. Provide clear and insightful responses.".to_string()
}

fn default_user_template() -> String {
    "Question: {question}".to_string()
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            system: default_system_prompt(),
            user: default_user_template(),
        }
    }
}

/// Which authentication gateway to use
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// Accept any non-empty credentials and hand out a constant token
    #[default]
    Stub,
    /// Forward login and registration to a remote HTTP API
    Remote,
}

impl std::fmt::Display for AuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stub => write!(f, "stub"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

impl AuthMode {
    /// Parse an auth mode from a string, case-insensitively
    pub fn parse_str(s: &str) -> std::result::Result<Self, String> {
        match s.to_lowercase().as_str() {
            "stub" | "demo" => Ok(Self::Stub),
            "remote" => Ok(Self::Remote),
            other => Err(format!("Unknown auth mode: {}", other)),
        }
    }
}

/// Authentication gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Stub or remote gateway
    #[serde(default)]
    pub mode: AuthMode,

    /// Base URL of the remote auth API (`/login/` and `/register/` are appended)
    #[serde(default = "default_auth_base_url")]
    pub base_url: String,

    /// Require a matching password confirmation on the registration form
    #[serde(default = "default_require_confirmation")]
    pub require_confirmation: bool,
}

fn default_auth_base_url() -> String {
    "http://127.0.0.1:8000/api".to_string()
}

fn default_require_confirmation() -> bool {
    true
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            mode: AuthMode::default(),
            base_url: default_auth_base_url(),
            require_confirmation: default_require_confirmation(),
        }
    }
}

/// Chat page configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Render completion failures as an assistant bubble instead of failing the page
    #[serde(default = "default_inline_errors")]
    pub inline_errors: bool,

    /// Canned example questions offered in the sidebar
    #[serde(default = "default_examples")]
    pub examples: Vec<String>,
}

fn default_inline_errors() -> bool {
    true
}

fn default_examples() -> Vec<String> {
    vec![
        "Explain quantum computing".to_string(),
        "How do I make a HTTP request in Python?".to_string(),
        "Difference between AI and ML".to_string(),
        "Suggest healthy breakfast ideas".to_string(),
    ]
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            inline_errors: default_inline_errors(),
            examples: default_examples(),
        }
    }
}

/// Presentation strings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Chat page heading
    #[serde(default = "default_title")]
    pub title: String,

    /// Line shown under the heading
    #[serde(default = "default_caption")]
    pub caption: String,
}

fn default_title() -> String {
    "💬 GenAI Assistant 🤖".to_string()
}

fn default_caption() -> String {
    "🚀 Powered by Google Gemini 🌐 | Demo Version".to_string()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            caption: default_caption(),
        }
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,

    /// Seconds a session may sit unused before it is forgotten
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_session_idle_secs() -> u64 {
    3600
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            session_idle_secs: default_session_idle_secs(),
        }
    }
}

/// Startup database probe configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string; the probe is skipped when unset
    #[serde(default)]
    pub url: Option<String>,
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error: defaults are used and a warning is
    /// logged.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ParleyError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from a YAML document
    pub fn from_yaml(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
            .map_err(|e| ParleyError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(provider_type) = lookup("PARLEY_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Some(model) = lookup("PARLEY_GEMINI_MODEL") {
            self.provider.gemini.model = model;
        }

        if let Some(host) = lookup("PARLEY_OLLAMA_HOST") {
            self.provider.ollama.host = host;
        }

        if let Some(model) = lookup("PARLEY_OLLAMA_MODEL") {
            self.provider.ollama.model = model;
        }

        if let Some(mode) = lookup("PARLEY_AUTH_MODE") {
            match AuthMode::parse_str(&mode) {
                Ok(m) => self.auth.mode = m,
                Err(e) => tracing::warn!("Invalid PARLEY_AUTH_MODE: {}", e),
            }
        }

        if let Some(base_url) = lookup("PARLEY_AUTH_BASE_URL") {
            self.auth.base_url = base_url;
        }

        if let Some(inline) = lookup("PARLEY_INLINE_ERRORS") {
            match inline.parse::<bool>() {
                Ok(v) => self.chat.inline_errors = v,
                Err(_) => tracing::warn!("Invalid PARLEY_INLINE_ERRORS: {}", inline),
            }
        }

        if let Some(host) = lookup("PARLEY_HOST") {
            self.server.host = host;
        }

        if let Some(port) = lookup("PARLEY_PORT") {
            if let Ok(value) = port.parse() {
                self.server.port = value;
            } else {
                tracing::warn!("Invalid PARLEY_PORT: {}", port);
            }
        }

        if let Some(secs) = lookup("PARLEY_SESSION_IDLE_SECS") {
            match secs.parse() {
                Ok(value) => self.server.session_idle_secs = value,
                Err(_) => tracing::warn!("Invalid PARLEY_SESSION_IDLE_SECS: {}", secs),
            }
        }

        if let Some(url) = lookup(DATABASE_URL_VAR) {
            if !url.trim().is_empty() {
                self.database.url = Some(url);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let crate::cli::Commands::Serve { host, port, .. } = &cli.command {
            if let Some(host) = host {
                self.server.host = host.clone();
            }
            if let Some(port) = port {
                self.server.port = *port;
            }
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        let valid_providers = ["gemini", "ollama"];
        if !valid_providers.contains(&self.provider.provider_type.as_str()) {
            return Err(ParleyError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                valid_providers.join(", ")
            ))
            .into());
        }

        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(ParleyError::Config(
                "generation.temperature must be between 0.0 and 2.0".to_string(),
            )
            .into());
        }

        if self.generation.max_output_tokens == 0 {
            return Err(ParleyError::Config(
                "generation.max_output_tokens must be greater than 0".to_string(),
            )
            .into());
        }

        if !self.prompt.user.contains(QUESTION_PLACEHOLDER) {
            return Err(ParleyError::Config(format!(
                "prompt.user must contain the {} placeholder",
                QUESTION_PLACEHOLDER
            ))
            .into());
        }

        if self.chat.examples.is_empty() {
            return Err(
                ParleyError::Config("chat.examples cannot be empty".to_string()).into(),
            );
        }

        if self.server.port == 0 {
            return Err(
                ParleyError::Config("server.port must be greater than 0".to_string()).into(),
            );
        }

        if self.server.session_idle_secs == 0 {
            return Err(ParleyError::Config(
                "server.session_idle_secs must be greater than 0".to_string(),
            )
            .into());
        }

        if self.auth.mode == AuthMode::Remote {
            if self.auth.base_url.trim().is_empty() {
                return Err(ParleyError::Config(
                    "auth.base_url is required for remote auth".to_string(),
                )
                .into());
            }
            url::Url::parse(&self.auth.base_url).map_err(|e| {
                ParleyError::Config(format!("Invalid auth.base_url: {}", e))
            })?;
        }

        Ok(())
    }
}

/// Load a `.env` file from the working directory when one exists
///
/// Variables already present in the environment are left untouched.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Failed to load .env file: {}", e),
    }
}

/// Secrets read from the process environment at startup
///
/// Kept apart from [`Config`] so they are never serialized or logged.
#[derive(Clone, Default)]
pub struct Secrets {
    /// Gemini API key
    pub google_api_key: Option<String>,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field(
                "google_api_key",
                &self.google_api_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl Secrets {
    /// Read secrets from the process environment
    ///
    /// Call [`load_dotenv`] first so a `.env` file is honoured.
    ///
    /// # Errors
    ///
    /// Returns `MissingCredentials` when the selected provider needs a key
    /// that is not set.
    pub fn from_env(config: &Config) -> Result<Self> {
        Self::resolve(config, |key| std::env::var(key).ok())
    }

    /// Resolve secrets through an arbitrary lookup function
    pub fn resolve(config: &Config, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let google_api_key = lookup(GOOGLE_API_KEY_VAR).filter(|k| !k.trim().is_empty());

        if config.provider.provider_type == "gemini" && google_api_key.is_none() {
            return Err(ParleyError::MissingCredentials(format!(
                "{} is missing! Set it in the environment or a .env file.",
                GOOGLE_API_KEY_VAR
            ))
            .into());
        }

        Ok(Self { google_api_key })
    }
}
