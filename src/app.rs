//! Chat page state machine
//!
//! Every user interaction is an [`Action`]. [`ChatApp::dispatch`] applies
//! it to one session, calling the auth or completion gateway when the
//! transition needs it. Rendering happens separately from the resulting
//! state.

use std::sync::Arc;

use crate::auth::AuthGateway;
use crate::completion::CompletionGateway;
use crate::config::Config;
use crate::error::{ParleyError, Result};
use crate::session::{Notice, Page, SessionHandle};

/// Banner after a successful login
pub const LOGIN_SUCCESS: &str = "Login successful!";
/// Banner after a successful registration
pub const REGISTER_SUCCESS: &str = "Account created! Please login.";
/// Banner after a rejected login
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
/// Banner when a second question arrives while one is in flight
pub const STILL_GENERATING: &str = "A reply is still being generated";
/// Banner when the registration passwords differ
pub const PASSWORD_MISMATCH: &str = "Passwords do not match";
/// Banner when a registration field is blank
pub const FIELDS_REQUIRED: &str = "All fields are required";

/// Prefix of the assistant bubble shown for a failed completion
pub const ERROR_BUBBLE_PREFIX: &str = "⚠️ Error: ";

/// A single user interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Submit the login form
    Login { email: String, password: String },
    /// Go from login to register
    ShowRegister,
    /// Submit the registration form
    Register {
        username: String,
        email: String,
        password: String,
        confirm: String,
    },
    /// Go back from register to login
    ShowLogin,
    /// Ask a question
    Submit { question: String },
    /// Pre-fill the input with a canned example
    UseExample { index: usize },
    /// Switch between light and dark
    ToggleTheme,
    /// Empty the transcript
    ClearHistory,
    /// Drop the token and return to login
    Logout,
}

impl Action {
    /// Short name for logs; never includes field values
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::ShowRegister => "show_register",
            Self::Register { .. } => "register",
            Self::ShowLogin => "show_login",
            Self::Submit { .. } => "submit",
            Self::UseExample { .. } => "use_example",
            Self::ToggleTheme => "toggle_theme",
            Self::ClearHistory => "clear_history",
            Self::Logout => "logout",
        }
    }
}

/// Behaviour switches for the state machine
#[derive(Debug, Clone)]
pub struct ChatSettings {
    /// Show completion failures as an assistant bubble
    pub inline_errors: bool,
    /// Require the password to be typed twice on register
    pub require_confirmation: bool,
    /// Canned example questions
    pub examples: Vec<String>,
}

impl From<&Config> for ChatSettings {
    fn from(config: &Config) -> Self {
        Self {
            inline_errors: config.chat.inline_errors,
            require_confirmation: config.auth.require_confirmation,
            examples: config.chat.examples.clone(),
        }
    }
}

/// Applies actions to sessions
#[derive(Clone)]
pub struct ChatApp {
    auth: Arc<dyn AuthGateway>,
    completion: CompletionGateway,
    settings: ChatSettings,
}

impl ChatApp {
    /// Create the state machine
    pub fn new(
        auth: Arc<dyn AuthGateway>,
        completion: CompletionGateway,
        settings: ChatSettings,
    ) -> Self {
        Self {
            auth,
            completion,
            settings,
        }
    }

    /// Apply `action` to the session behind `handle`
    ///
    /// Actions that make no sense on the current page are ignored.
    ///
    /// # Errors
    ///
    /// Returns `ParleyError::Completion` when the completion call fails and
    /// inline errors are disabled. Every other failure is reported through
    /// the session's notice.
    pub async fn dispatch(&self, handle: &SessionHandle, action: Action) -> Result<()> {
        tracing::debug!(action = action.name(), "Dispatching action");

        match action {
            Action::Login { email, password } => self.login(handle, &email, &password).await,
            Action::ShowRegister => {
                let mut session = handle.lock().await;
                if session.page() == Page::Login {
                    session.show(Page::Register);
                } else {
                    tracing::debug!(page = %session.page(), "Ignoring show_register");
                }
                Ok(())
            }
            Action::Register {
                username,
                email,
                password,
                confirm,
            } => {
                self.register(handle, &username, &email, &password, &confirm)
                    .await
            }
            Action::ShowLogin => {
                let mut session = handle.lock().await;
                if session.page() == Page::Register {
                    session.show(Page::Login);
                } else {
                    tracing::debug!(page = %session.page(), "Ignoring show_login");
                }
                Ok(())
            }
            Action::Submit { question } => self.submit(handle, question).await,
            Action::UseExample { index } => {
                let mut session = handle.lock().await;
                if session.page() != Page::Chat || session.is_busy() {
                    tracing::debug!("Ignoring example shortcut");
                    return Ok(());
                }
                match self.settings.examples.get(index) {
                    Some(example) => session.set_draft(Some(example.clone())),
                    None => tracing::debug!(index, "Example index out of range"),
                }
                Ok(())
            }
            Action::ToggleTheme => {
                handle.lock().await.toggle_theme();
                Ok(())
            }
            Action::ClearHistory => {
                let mut session = handle.lock().await;
                if session.page() == Page::Chat && !session.is_busy() {
                    session.clear_transcript();
                }
                Ok(())
            }
            Action::Logout => {
                let mut session = handle.lock().await;
                if session.is_authenticated() {
                    tracing::info!("Session logged out");
                }
                session.reset_auth();
                Ok(())
            }
        }
    }

    async fn login(&self, handle: &SessionHandle, email: &str, password: &str) -> Result<()> {
        let mut session = handle.lock().await;
        if session.page() != Page::Login {
            tracing::debug!(page = %session.page(), "Ignoring login");
            return Ok(());
        }

        match self.auth.login(email, password).await {
            Some(token) => {
                tracing::info!("Login succeeded");
                session.authenticate(token);
                session.set_notice(Notice::success(LOGIN_SUCCESS));
            }
            None => {
                tracing::warn!("Login failed");
                session.set_notice(Notice::error(INVALID_CREDENTIALS));
            }
        }
        Ok(())
    }

    async fn register(
        &self,
        handle: &SessionHandle,
        username: &str,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> Result<()> {
        let mut session = handle.lock().await;
        if session.page() != Page::Register {
            tracing::debug!(page = %session.page(), "Ignoring register");
            return Ok(());
        }

        if [username, email, password]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            session.set_notice(Notice::error(FIELDS_REQUIRED));
            return Ok(());
        }
        if self.settings.require_confirmation && password != confirm {
            session.set_notice(Notice::error(PASSWORD_MISMATCH));
            return Ok(());
        }

        let outcome = self.auth.register(username, email, password).await;
        if outcome.is_success() {
            tracing::info!("Registration succeeded");
            session.show(Page::Login);
            session.set_notice(Notice::success(REGISTER_SUCCESS));
        } else {
            tracing::warn!(status = outcome.status_code, "Registration failed");
            session.set_notice(Notice::error(format!(
                "Registration failed: {}",
                outcome.message
            )));
        }
        Ok(())
    }

    async fn submit(&self, handle: &SessionHandle, question: String) -> Result<()> {
        let ticket = {
            let mut session = handle.lock().await;
            if session.page() != Page::Chat || !session.is_authenticated() {
                tracing::debug!(page = %session.page(), "Ignoring submit");
                return Ok(());
            }
            if question.trim().is_empty() {
                return Ok(());
            }
            if session.is_busy() {
                session.set_notice(Notice::error(STILL_GENERATING));
                return Ok(());
            }

            session.push_user(question.as_str());
            session.set_draft(None);
            session.set_busy(true);
            session.submission()
        };

        let result = self.completion.ask(&question).await;

        let mut session = handle.lock().await;
        // A logout or a newer question owns the session and its busy flag now
        if session.submission() != ticket {
            tracing::debug!("Discarding reply to a superseded question");
            return Ok(());
        }
        session.set_busy(false);

        match result {
            Ok(reply) => {
                session.push_assistant(reply);
                Ok(())
            }
            Err(err) => {
                tracing::warn!("Completion failed: {}", err);
                if self.settings.inline_errors {
                    let cause = match err.downcast_ref::<ParleyError>() {
                        Some(ParleyError::Completion(cause)) => cause.clone(),
                        _ => err.to_string(),
                    };
                    session.push_assistant(format!("{}{}", ERROR_BUBBLE_PREFIX, cause));
                    Ok(())
                } else {
                    Err(err)
                }
            }
        }
    }
}
