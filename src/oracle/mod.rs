//! Response oracle subsystem.
//!
//! # Data Flow
//! ```text
//! candidate Invocation
//!     → to_text()
//!     → Oracle::execute (executor.rs runs curl, capture sinks in temp files)
//!     → [retry.rs re-runs failed calls when configured]
//!     → Response { status, body }
//!     → compare.rs PredicateSet::equivalent(baseline, candidate)
//! ```
//!
//! # Design Decisions
//! - The oracle sees only command text, so any executor (real curl, scripted test double)
//!   plugs in behind the same trait
//! - One call in flight at a time; callers await each result before the next
//! - Temp sinks live exactly as long as a single call

pub mod compare;
pub mod executor;
pub mod retry;
pub mod types;

use async_trait::async_trait;

pub use compare::{Predicate, PredicateSet};
pub use executor::CurlExecutor;
pub use retry::{RetryPolicy, Retrying};
pub use types::{ExecutionError, Response};

/// Executes invocation text and reports the response it produced.
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn execute(&self, command: &str) -> Result<Response, ExecutionError>;
}

/// Plain functions and closures are oracles, which keeps scripted servers in tests short.
#[async_trait]
impl<F> Oracle for F
where
    F: Fn(&str) -> Result<Response, ExecutionError> + Send + Sync,
{
    async fn execute(&self, command: &str) -> Result<Response, ExecutionError> {
        self(command)
    }
}
