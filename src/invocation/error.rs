//! Error types raised by the invocation model.

use thiserror::Error;

/// The invocation text could not be turned into an [`Invocation`](super::Invocation).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A quote was opened but never closed.
    #[error("unbalanced quoting in command text")]
    UnbalancedQuotes,

    /// Nothing but whitespace and comments.
    #[error("no statements found in command")]
    Empty,

    /// The first word is not a curl program.
    #[error("not a curl command: first word is `{0}`")]
    NotCurl(String),

    /// A token cannot be represented on a shell command line.
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

/// No argument could be identified as the request URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassificationError {
    #[error("could not find URL in curl command")]
    NoUrl,
}

/// A rewritten token could not be encoded back into command text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("token contains a NUL byte and cannot be shell-quoted: {0:?}")]
    Unquotable(String),
}

/// Failure while deleting a query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryEditError {
    #[error(transparent)]
    Classification(#[from] ClassificationError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),
}
