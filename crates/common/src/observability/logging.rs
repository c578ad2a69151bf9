//! Tracing subscriber initialization
//!
//! Installs a registry with an `EnvFilter` and either the human readable
//! `fmt` layer or the JSON layer. `RUST_LOG` wins over the configured filter
//! when it is set.

use thiserror::Error;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, registry};

/// Errors raised while installing the global subscriber
#[derive(Debug, Error)]
pub enum LoggingInitError {
    /// The filter directive could not be parsed
    #[error("Invalid log filter '{filter}': {message}")]
    InvalidFilter { filter: String, message: String },

    /// A global subscriber was already installed
    #[error("Global tracing subscriber already installed")]
    AlreadyInitialized,
}

/// Install the global tracing subscriber.
///
/// # Arguments
/// * `filter` - `EnvFilter` directive used when `RUST_LOG` is unset
/// * `json` - emit JSON lines instead of human readable output
///
/// # Errors
/// Returns `LoggingInitError::InvalidFilter` for an unparsable directive and
/// `LoggingInitError::AlreadyInitialized` when called twice.
pub fn init_logging(filter: &str, json: bool) -> Result<(), LoggingInitError> {
    let env_filter = build_filter(filter)?;

    let result = if json {
        registry().with(env_filter).with(fmt::layer().json().with_target(true)).try_init()
    } else {
        registry().with(env_filter).with(fmt::layer().with_target(false)).try_init()
    };

    result.map_err(|_| LoggingInitError::AlreadyInitialized)
}

fn build_filter(filter: &str) -> Result<EnvFilter, LoggingInitError> {
    if let Ok(from_env) = EnvFilter::try_from_default_env() {
        return Ok(from_env);
    }

    EnvFilter::try_new(filter).map_err(|e| LoggingInitError::InvalidFilter {
        filter: filter.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_module_directives() {
        assert!(build_filter("info,ignitegym_core=debug").is_ok());
    }

    #[test]
    fn second_initialization_is_reported() {
        // Only the first call in this test binary can win.
        let first = init_logging("warn", false);
        let second = init_logging("warn", true);

        assert!(first.is_ok() || matches!(first, Err(LoggingInitError::AlreadyInitialized)));
        assert!(matches!(second, Err(LoggingInitError::AlreadyInitialized)));
    }
}
