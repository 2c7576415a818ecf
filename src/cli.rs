//! Command-line interface definition for Parley
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands to serve the web UI, ask a one-off question,
//! and probe the configured database.

use clap::{Parser, Subcommand};

/// Parley - login-gated chat front-end for hosted LLMs
///
/// Serves a small web UI that forwards questions to a completion
/// endpoint and shows the conversation as a message list.
#[derive(Parser, Debug, Clone)]
#[command(name = "parley")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Parley
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve the chat web UI
    Serve {
        /// Interface to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Open the UI in the default browser once listening
        #[arg(long)]
        open: bool,
    },

    /// Ask a single question and print the reply
    Ask {
        /// The question to send
        question: String,
    },

    /// Run the startup database probe and report the server time
    CheckDb,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            json_logs: false,
            command: Commands::Serve {
                host: None,
                port: None,
                open: false,
            },
        }
    }
}
