//! Test utilities for Parley
//!
//! Provides a scripted in-memory provider and a stub auth gateway that
//! records its calls, so the chat state machine can be exercised without
//! any network.

use crate::auth::{AuthGateway, RegisterOutcome};
use crate::config::GenerationConfig;
use crate::error::{ParleyError, Result};
use crate::providers::{CompletionResponse, Message, Provider};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

type RecordedCall = (Vec<Message>, GenerationConfig);

/// Provider that replays canned replies in order
///
/// Each `complete` call takes the next scripted outcome as it starts, so
/// outcomes follow call order even when a gate releases calls later. When
/// the script is exhausted the last outcome is repeated. An optional gate
/// holds every call until the test releases it.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<std::result::Result<String, String>>>,
    last: Mutex<Option<std::result::Result<String, String>>>,
    calls: Mutex<Vec<RecordedCall>>,
    gate: Option<Arc<Notify>>,
    entered: Arc<Notify>,
}

impl ScriptedProvider {
    fn from_script(script: Vec<std::result::Result<String, String>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            gate: None,
            entered: Arc::new(Notify::new()),
        }
    }

    /// Provider that answers with `replies` in order
    pub fn replying<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_script(replies.into_iter().map(|r| Ok(r.into())).collect())
    }

    /// Provider whose every call fails with `message`
    pub fn failing(message: &str) -> Self {
        Self::from_script(vec![Err(message.to_string())])
    }

    /// Hold every call until the returned `Notify` is signalled
    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(gate.clone());
        (self, gate)
    }

    /// Signalled each time a call starts
    pub fn entered(&self) -> Arc<Notify> {
        self.entered.clone()
    }

    /// Every prompt and parameter set received so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn complete(
        &self,
        messages: &[Message],
        params: &GenerationConfig,
    ) -> Result<CompletionResponse> {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push((messages.to_vec(), *params));
        let next = {
            let mut script = self.script.lock().expect("script lock poisoned");
            let mut last = self.last.lock().expect("last lock poisoned");
            if let Some(outcome) = script.pop_front() {
                *last = Some(outcome.clone());
                outcome
            } else {
                last.clone().unwrap_or_else(|| Err("script exhausted".to_string()))
            }
        };
        self.entered.notify_one();

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        match next {
            Ok(text) => Ok(CompletionResponse::new(Message::assistant(text))),
            Err(message) => Err(ParleyError::Provider(message).into()),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }
}

/// Auth gateway double that records calls and returns fixed outcomes
pub struct RecordingAuth {
    token: Option<String>,
    register_status: u16,
    login_calls: Mutex<Vec<String>>,
    register_calls: Mutex<Vec<String>>,
}

impl RecordingAuth {
    /// Gateway that accepts every login and registration
    pub fn accepting() -> Self {
        Self {
            token: Some("test_token".to_string()),
            register_status: 201,
            login_calls: Mutex::new(Vec::new()),
            register_calls: Mutex::new(Vec::new()),
        }
    }

    /// Gateway that rejects every login and registration
    pub fn rejecting() -> Self {
        Self {
            token: None,
            register_status: 400,
            ..Self::accepting()
        }
    }

    /// Emails passed to `login`
    pub fn login_calls(&self) -> Vec<String> {
        self.login_calls.lock().expect("login lock poisoned").clone()
    }

    /// Usernames passed to `register`
    pub fn register_calls(&self) -> Vec<String> {
        self.register_calls
            .lock()
            .expect("register lock poisoned")
            .clone()
    }
}

#[async_trait]
impl AuthGateway for RecordingAuth {
    async fn login(&self, email: &str, _password: &str) -> Option<String> {
        self.login_calls
            .lock()
            .expect("login lock poisoned")
            .push(email.to_string());
        self.token.clone()
    }

    async fn register(&self, username: &str, _email: &str, _password: &str) -> RegisterOutcome {
        self.register_calls
            .lock()
            .expect("register lock poisoned")
            .push(username.to_string());
        RegisterOutcome::new(self.register_status, "recorded")
    }
}
