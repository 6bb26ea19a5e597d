//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a minimization run.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::oracle::Predicate;

/// Root configuration for the minimizer.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct MinimizerConfig {
    /// Which element categories to reduce.
    pub reduce: ReduceConfig,

    /// Response equivalence predicates.
    pub compare: CompareConfig,

    /// Elements never proposed for removal.
    pub protect: ProtectConfig,

    /// How candidates are executed.
    pub executor: ExecutorConfig,

    /// Run-wide bounds.
    pub limits: LimitsConfig,

    /// Logging and trace output.
    pub observability: ObservabilityConfig,
}

/// Category switches.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ReduceConfig {
    /// Reduce `-H` headers (cookie headers excluded).
    pub headers: bool,

    /// Reduce cookie carriers and their entries.
    pub cookies: bool,

    /// Reduce URL query parameters.
    pub params: bool,

    /// Record a decision per tested candidate.
    pub trace: bool,
}

impl Default for ReduceConfig {
    fn default() -> Self {
        Self {
            headers: true,
            cookies: true,
            params: true,
            trace: false,
        }
    }
}

/// Equivalence configuration. Empty means body-content equality.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct CompareConfig {
    pub predicates: Vec<Predicate>,
}

/// Protected element names.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ProtectConfig {
    /// Header names, matched case-insensitively.
    pub headers: Vec<String>,

    /// Cookie names, matched exactly.
    pub cookies: Vec<String>,

    /// Query keys, matched exactly.
    pub params: Vec<String>,
}

/// Query key protected unless the configuration says otherwise.
pub const DEFAULT_PROTECTED_PARAM: &str = "auth_key";

impl Default for ProtectConfig {
    fn default() -> Self {
        Self {
            headers: Vec::new(),
            cookies: Vec::new(),
            params: vec![DEFAULT_PROTECTED_PARAM.to_string()],
        }
    }
}

/// Curl execution settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Binary to run instead of the command's own program word.
    pub curl_binary: Option<String>,

    /// Per-call timeout in seconds (0 disables).
    pub timeout_secs: u64,

    /// Extra attempts for a failed call.
    pub retries: u32,

    /// First retry delay in milliseconds.
    pub retry_base_delay_ms: u64,

    /// Retry delay cap in milliseconds.
    pub retry_max_delay_ms: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            curl_binary: None,
            timeout_secs: 30,
            retries: 0,
            retry_base_delay_ms: 200,
            retry_max_delay_ms: 2000,
        }
    }
}

/// Run-wide limits.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct LimitsConfig {
    /// Stop reducing after this many seconds (0 disables).
    pub deadline_secs: u64,
}

/// Trace rendering.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TraceFormat {
    #[default]
    Text,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    pub log_level: String,

    /// How the decision trace is printed.
    pub trace_format: TraceFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            trace_format: TraceFormat::Text,
        }
    }
}
