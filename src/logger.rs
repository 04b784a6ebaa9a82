//! Logging initialisation via tracing-subscriber.
//!
//! Call [`init`] once at startup, before any files are loaded.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Errors while setting up logging.
#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("invalid log level '{level}': {reason}")]
    InvalidLevel { level: String, reason: String },

    #[error("failed to set subscriber: {0}")]
    Subscriber(String),
}

/// Default level when neither `--debug` nor `RUST_LOG` is given.
pub const DEFAULT_LEVEL: &str = "warn";

/// Initialise the global tracing subscriber, writing to stderr.
///
/// With `debug` set, the `debug` level wins over `RUST_LOG`. Otherwise
/// `RUST_LOG` is used when valid and [`DEFAULT_LEVEL`] is the fallback.
pub fn init(debug: bool) -> Result<(), LoggerError> {
    let filter = if debug {
        EnvFilter::try_new("debug").map_err(|e| invalid("debug", e))?
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(DEFAULT_LEVEL))
            .map_err(|e| invalid(DEFAULT_LEVEL, e))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(true)
        .try_init()
        .map_err(|e| LoggerError::Subscriber(e.to_string()))
}

fn invalid(level: &str, err: impl std::fmt::Display) -> LoggerError {
    LoggerError::InvalidLevel {
        level: level.to_string(),
        reason: err.to_string(),
    }
}
