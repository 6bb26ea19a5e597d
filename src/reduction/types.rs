//! Engine result and error definitions.

use serde::Serialize;
use thiserror::Error;

use crate::invocation::{Invocation, ParseError, QueryEditError};
use crate::lifecycle::StopReason;
use crate::oracle::{ExecutionError, Response};
use crate::reduction::trace::Decision;

/// Element categories, reduced in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Header,
    Cookie,
    QueryParam,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Header => "header",
            Category::Cookie => "cookie",
            Category::QueryParam => "query_param",
        }
    }
}

/// Failures that end a minimization without a result.
#[derive(Debug, Error)]
pub enum MinimizeError {
    #[error("failed to parse curl command")]
    Parse(#[from] ParseError),

    #[error("failed to get baseline response")]
    Baseline(#[source] ExecutionError),
}

/// Outcome of a minimization.
#[derive(Debug, Clone)]
pub struct Reduction {
    /// The reduced invocation.
    pub invocation: Invocation,

    /// Response every accepted candidate was compared against.
    pub baseline: Response,

    /// Per-candidate decisions, in test order; empty unless tracing was enabled.
    pub trace: Vec<Decision>,

    /// Oracle executions made, baseline included.
    pub oracle_calls: usize,

    /// Accepted removals.
    pub removals: usize,

    /// Set when a stop request or deadline cut the run short.
    pub stopped: Option<StopReason>,

    /// Why query-parameter reduction was abandoned, if it was.
    pub query_error: Option<QueryEditError>,
}

impl Reduction {
    /// The reduced command text.
    pub fn text(&self) -> String {
        self.invocation.to_text()
    }
}
