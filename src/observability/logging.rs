//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Keep stdout free for the reduced command (logs go to stderr)
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level
//! - `--verbose` raises the crate to debug

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Filter directive derived from configuration.
pub fn default_directive(config: &ObservabilityConfig, verbose: bool) -> String {
    if verbose {
        "curlmin=debug".to_string()
    } else {
        config.log_level.clone()
    }
}

/// Install the global subscriber. Safe to call once per process.
pub fn init_logging(config: &ObservabilityConfig, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config, verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
