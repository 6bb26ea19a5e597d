//! Decision trace records and their rendering.

use std::fmt;

use serde::Serialize;

use crate::config::TraceFormat;
use crate::reduction::types::Category;

/// What kind of element a candidate removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Header,
    CookieHeader,
    CookieFlag,
    Cookie,
    QueryParam,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ElementKind::Header => "Header",
            ElementKind::CookieHeader => "Cookie header",
            ElementKind::CookieFlag => "Cookie flag",
            ElementKind::Cookie => "Cookie",
            ElementKind::QueryParam => "Query parameter",
        })
    }
}

/// Whether the tested element stays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Kept,
    Removed,
}

/// One tested candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub category: Category,
    pub kind: ElementKind,
    pub element: String,
    pub verdict: Verdict,
    /// Execution failure that forced the element to be kept.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let needed = match self.verdict {
            Verdict::Kept => "needed",
            Verdict::Removed => "not needed",
        };
        write!(f, "{} {}: {}", self.kind, needed, self.element)?;
        if let Some(error) = &self.error {
            write!(f, " (execution failed: {error})")?;
        }
        Ok(())
    }
}

/// Render decisions one per line.
pub fn render_trace(decisions: &[Decision], format: TraceFormat) -> Result<String, serde_json::Error> {
    let lines = match format {
        TraceFormat::Text => decisions.iter().map(Decision::to_string).collect::<Vec<_>>(),
        TraceFormat::Json => decisions
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?,
    };
    Ok(lines.join("\n"))
}
