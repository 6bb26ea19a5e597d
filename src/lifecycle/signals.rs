//! OS signal handling.
//!
//! # Responsibilities
//! - Translate Ctrl-C into a stop request for the running engine
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - The engine finishes its in-flight oracle call and returns the last verified command

use std::sync::Arc;

use crate::lifecycle::shutdown::Shutdown;

/// Spawn a task that triggers `shutdown` on the first Ctrl-C.
pub fn forward_ctrl_c(shutdown: Arc<Shutdown>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current candidate");
            shutdown.trigger();
        }
    });
}
