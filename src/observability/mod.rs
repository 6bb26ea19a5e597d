//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Engine and oracle produce:
//!     → logging.rs (structured log events on stderr)
//!     → metrics.rs (counters through the metrics facade)
//!
//! Consumers:
//!     → terminal (stderr)
//!     → any metrics recorder installed by an embedding host
//! ```

pub mod logging;
pub mod metrics;
