//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGINT → Shutdown::trigger
//!
//! Stop (shutdown.rs):
//!     trigger or deadline → StopListener::check at the next oracle boundary
//!     → engine returns the last committed invocation, marked interrupted
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, StopListener, StopReason};
