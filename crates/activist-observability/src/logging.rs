//! Logging setup
//!
//! Installs the global `tracing` subscriber. The configured level is the
//! default; a `RUST_LOG` directive in the environment takes precedence.

use tracing::Level;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(#[from] SetGlobalDefaultError),
}

/// Map a configured level name to a `Level`. Unknown names fall back to INFO.
pub fn parse_level(level: &str) -> Level {
    match level.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Filter for the configured level, unless `RUST_LOG` is set.
pub fn build_filter(level: &str) -> EnvFilter {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(parse_level(level).to_string()),
    }
}

/// Install the global subscriber, human-readable or JSON lines.
pub fn init_logging(level: &str, json: bool) -> Result<(), LoggingError> {
    let filter = build_filter(level);

    if json {
        let subscriber = FmtSubscriber::builder()
            .json()
            .with_env_filter(filter)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}
