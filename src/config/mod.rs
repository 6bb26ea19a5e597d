//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → MinimizerConfig
//!     → CLI flag overrides (main.rs)
//!     → handed to the executor and the reduction engine
//! ```
//!
//! # Design Decisions
//! - Config is immutable once a run starts
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    CompareConfig, ExecutorConfig, LimitsConfig, MinimizerConfig, ObservabilityConfig,
    ProtectConfig, ReduceConfig, TraceFormat,
};
