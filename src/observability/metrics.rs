//! Metrics collection.
//!
//! # Metrics
//! - `curlmin_oracle_calls_total` (counter): oracle executions by category, outcome
//! - `curlmin_removals_total` (counter): committed removals by category
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed recorder it is a no-op
//! - Labels are static strings only

use crate::reduction::Category;

/// Outcome label for an oracle call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    Equivalent,
    Divergent,
    Failed,
}

impl CallOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            CallOutcome::Equivalent => "equivalent",
            CallOutcome::Divergent => "divergent",
            CallOutcome::Failed => "failed",
        }
    }
}

/// Record one candidate execution.
pub fn record_oracle_call(category: Category, outcome: CallOutcome) {
    ::metrics::counter!(
        "curlmin_oracle_calls_total",
        "category" => category.as_str(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// Record a committed removal.
pub fn record_removal(category: Category) {
    ::metrics::counter!("curlmin_removals_total", "category" => category.as_str()).increment(1);
}
