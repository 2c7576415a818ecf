//! Tracing subscriber setup
//!
//! `RUST_LOG` wins when set. Otherwise the default filter is `parley=info`,
//! or `parley=debug` with `--verbose`.

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive used when `RUST_LOG` is unset
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "parley=debug"
    } else {
        "parley=info"
    }
}

/// Install the global subscriber
///
/// # Arguments
///
/// * `verbose` - Raise the default level to debug
/// * `json` - Emit one JSON object per event instead of human-readable lines
///
/// # Errors
///
/// Returns error if the filter cannot be parsed or a subscriber is already set
pub fn init_tracing(verbose: bool, json: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(verbose)))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_target(true).with_level(true))
            .try_init()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "parley=info");
        assert_eq!(default_directive(true), "parley=debug");
    }

    #[test]
    fn test_default_directives_parse() {
        assert!(EnvFilter::try_new(default_directive(false)).is_ok());
        assert!(EnvFilter::try_new(default_directive(true)).is_ok());
    }
}
