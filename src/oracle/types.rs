//! Oracle response and error definitions.

use thiserror::Error;

/// What one execution produced. Never modified after capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: u16,
    body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Numeric status code; 0 when the status line could not be read.
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Whitespace-delimited token count.
    pub fn word_count(&self) -> usize {
        String::from_utf8_lossy(&self.body).split_whitespace().count()
    }

    /// Number of `\n`-delimited segments; an empty body has one.
    pub fn line_count(&self) -> usize {
        self.body.split(|b| *b == b'\n').count()
    }

    pub fn byte_len(&self) -> usize {
        self.body.len()
    }
}

/// The external client could not produce a response.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// Command text did not split into words.
    #[error("command text is not executable: {0}")]
    InvalidCommand(String),

    /// The process could not be started.
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran but exited unsuccessfully.
    #[error("curl exited with {}: {stderr}", .code.map_or_else(|| "a signal".to_string(), |c| format!("status {c}")))]
    Exit { code: Option<i32>, stderr: String },

    /// The process exceeded the per-call timeout and was killed.
    #[error("curl did not finish within {0} seconds")]
    Timeout(u64),

    /// Temporary capture files could not be created or read.
    #[error("failed to capture response: {0}")]
    Capture(#[source] std::io::Error),
}
