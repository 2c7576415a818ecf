use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use parley::auth::AuthGateway;
use parley::config::{Config, Secrets};
use parley::providers::create_provider;
use parley::render::UiSettings;
use parley::server::AppState;
use parley::{ChatApp, ChatSettings, CompletionGateway};
use tempfile::TempDir;

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Config pointing the Gemini provider at a mock server
#[allow(dead_code)]
pub fn gemini_config(api_base: &str) -> Config {
    let mut config = Config::default();
    config.provider.gemini.api_base = Some(api_base.to_string());
    config
}

/// Chat app wired to the configured provider with a fake API key
#[allow(dead_code)]
pub fn chat_app(config: &Config, auth: Arc<dyn AuthGateway>) -> ChatApp {
    let secrets = Secrets {
        google_api_key: Some("test-key".to_string()),
    };
    let provider = create_provider(&config.provider, &secrets).expect("provider");
    ChatApp::new(
        auth,
        CompletionGateway::from_config(provider, config),
        ChatSettings::from(config),
    )
}

/// Server state around `chat_app`
#[allow(dead_code)]
pub fn app_state(config: &Config, auth: Arc<dyn AuthGateway>) -> Arc<AppState> {
    Arc::new(AppState::new(
        chat_app(config, auth),
        UiSettings::from(config),
    ))
}

/// Gemini reply body carrying `text`
#[allow(dead_code)]
pub fn gemini_reply(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": {
            "promptTokenCount": 12,
            "candidatesTokenCount": 6,
            "totalTokenCount": 18
        }
    })
}
