//! Structured invocation model.
//!
//! # Data Flow
//! ```text
//! invocation text
//!     → parser.rs (fold continuations, shell-split, program check)
//!     → Invocation (ordered Arguments)
//!     → flags.rs (classify tokens: program, flag, flag value, positional)
//!     → headers / cookie.rs carriers / query.rs parameters
//!     → edits (remove argument, cookie entry, query parameter)
//!     → to_text (canonical single line)
//! ```
//!
//! # Design Decisions
//! - Tokens are stored decoded; quoting is recomputed canonically on render
//! - Flag+value pairs are always removed together
//! - Candidates are plain clones, so speculative edits never alias the committed state

pub mod argument;
pub mod cookie;
pub mod error;
pub mod flags;
pub mod model;
pub mod parser;
pub mod query;

pub use argument::Argument;
pub use cookie::{CarrierKind, CookieCarrier, CookieEntry};
pub use error::{ClassificationError, EncodingError, ParseError, QueryEditError};
pub use model::{HeaderElement, Invocation};
pub use query::QueryParameter;
