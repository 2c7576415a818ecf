/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level command modules:

- `serve`    : Start the web chat UI
- `ask`      : Send one question through the completion gateway
- `check_db` : Run the startup database probe on its own

The handlers only wire library components together: providers, the auth
gateway, the chat state machine and the web server.
*/

use crate::completion::CompletionGateway;
use crate::config::{Config, Secrets};
use crate::error::{ParleyError, Result};
use crate::providers::create_provider;
use std::sync::Arc;

/// Build the completion gateway for the configured provider
fn completion_gateway(config: &Config, secrets: &Secrets) -> Result<CompletionGateway> {
    let provider = create_provider(&config.provider, secrets)?;
    Ok(CompletionGateway::from_config(provider, config))
}

// Web UI handler
pub mod serve {
    //! Web UI handler.
    //!
    //! Builds the provider, auth gateway and chat state machine, then serves
    //! the pages until the process is stopped.

    use super::*;
    use crate::app::{ChatApp, ChatSettings};
    use crate::auth::create_auth_gateway;
    use crate::render::UiSettings;
    use crate::server::{start_server, AppState};
    use crate::session::SessionStore;
    use std::time::Duration;

    /// Start the web UI
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration (CLI overrides already applied)
    /// * `secrets` - Resolved provider secrets
    /// * `open_browser` - Launch the default browser once listening
    ///
    /// # Errors
    ///
    /// Returns error if a gateway cannot be built or the server fails to bind
    pub async fn run_serve(config: Config, secrets: Secrets, open_browser: bool) -> Result<()> {
        let completion = completion_gateway(&config, &secrets)?;
        let auth = create_auth_gateway(&config.auth)?;

        let app = ChatApp::new(auth, completion, ChatSettings::from(&config));
        let sessions = SessionStore::with_idle_timeout(Duration::from_secs(
            config.server.session_idle_secs,
        ));
        let state =
            Arc::new(AppState::new(app, UiSettings::from(&config)).with_sessions(sessions));

        start_server(&config.server, state, open_browser).await
    }
}

// One-shot question handler
pub mod ask {
    //! One-shot question handler.
    //!
    //! Uses the same completion gateway as the chat page, so the prompt and
    //! sampling parameters match exactly.

    use super::*;
    use colored::Colorize;

    /// Ask a single question and print the reply
    ///
    /// # Errors
    ///
    /// Returns error if the provider cannot be built or the completion fails
    pub async fn run_ask(config: Config, secrets: Secrets, question: String) -> Result<()> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ParleyError::Config("Question must not be empty".to_string()).into());
        }

        let gateway = completion_gateway(&config, &secrets)?;
        println!("{} {}", "You:".bold(), question);

        let reply = gateway.ask(question).await?;
        println!("{} {}", "Assistant:".green().bold(), reply);
        Ok(())
    }
}

// Database probe handler
pub mod check_db {
    //! Database probe handler.

    use super::*;
    use crate::config::DATABASE_URL_VAR;
    use colored::Colorize;

    /// Run `SELECT NOW()` against the configured database
    ///
    /// # Errors
    ///
    /// Returns error if no database URL is configured or the probe fails
    pub async fn run_check_db(config: &Config) -> Result<()> {
        let url = config.database.url.as_deref().ok_or_else(|| {
            ParleyError::Config(format!(
                "No database configured; set {} or database.url",
                DATABASE_URL_VAR
            ))
        })?;

        let now = crate::db::probe(url).await?;
        println!(
            "{} server time is {}",
            "Database reachable:".green(),
            now.to_rfc3339().cyan()
        );
        Ok(())
    }
}
