//! Reduction engine subsystem.
//!
//! # Data Flow
//! ```text
//! invocation text
//!     → Invocation::parse (fatal on error)
//!     → baseline oracle call (fatal on error)
//!     → headers pass loop → cookies pass loop (carrier, then entries) → query pass loop
//!         each candidate: clone → remove one element → oracle → compare with baseline
//!         first equivalent candidate is committed, pass restarts
//!     → Reduction { invocation, trace, counters }
//! ```
//!
//! # Design Decisions
//! - Greedy and order-sensitive; the result is 1-minimal, not globally minimal
//! - Candidate failures mean "keep the element"; they never abort the run
//! - Query-category failures abort only that category
//! - Stop requests are honoured between oracle calls, never during one

pub mod engine;
pub mod protected;
pub mod trace;
pub mod types;

pub use engine::Minimizer;
pub use protected::ProtectedElements;
pub use trace::{render_trace, Decision, ElementKind, Verdict};
pub use types::{Category, MinimizeError, Reduction};
