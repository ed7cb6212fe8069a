use std::io;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },
    #[error("Failed to initialize logging: {0}")]
    Init(String),
}

/// Pick the filter: RUST_LOG when set, otherwise `fallback`
pub fn build_filter(fallback: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(fallback).map_err(|e| LoggingError::InvalidFilter {
        filter: fallback.to_string(),
        reason: e.to_string(),
    })
}

/// Install the global subscriber. Output goes to stderr so command output on
/// stdout stays clean.
pub fn init_logging(fallback: &str) -> Result<(), LoggingError> {
    let filter = build_filter(fallback)?;
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}
