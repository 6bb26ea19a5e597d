//! curl invocation minimizer library.
//!
//! Reduces a curl command to a 1-minimal subset of its headers, cookies and query parameters
//! that still produces an equivalent response.

pub mod config;
pub mod invocation;
pub mod lifecycle;
pub mod observability;
pub mod oracle;
pub mod reduction;

pub use config::MinimizerConfig;
pub use invocation::Invocation;
pub use lifecycle::Shutdown;
pub use oracle::{CurlExecutor, Oracle, Response};
pub use reduction::{Minimizer, Reduction};
