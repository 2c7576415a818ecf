//! Parley - login-gated web chat front-end library
//!
//! This library provides a small multi-user chat UI that forwards each
//! question to a hosted LLM completion endpoint and shows the exchange as a
//! message list.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: Per-connection state and the in-memory session store
//! - `auth`: Login/registration gateway (stub or remote HTTP)
//! - `providers`: Completion backends (Gemini, Ollama)
//! - `prompts`: The system + user prompt template
//! - `completion`: Question to reply adapter over a provider
//! - `app`: The page state machine driven by `Action`s
//! - `render`: Pure HTML rendering of a session
//! - `server`: axum routes, session cookie and post/redirect/get
//! - `config`: Configuration loading, env overrides and validation
//! - `db`: One-shot startup database probe
//! - `logging`: tracing subscriber setup
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use parley::Config;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::from_yaml("server: { port: 8080 }")?;
//!     config.validate()?;
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod completion;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod prompts;
pub mod providers;
pub mod render;
pub mod server;
pub mod session;

// Re-export commonly used types
pub use app::{Action, ChatApp, ChatSettings};
pub use completion::CompletionGateway;
pub use config::Config;
pub use error::{ParleyError, Result};
pub use session::{Session, SessionStore};

#[cfg(test)]
pub mod test_utils;
