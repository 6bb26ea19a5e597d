//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (retry delays ordered, names non-empty)
//! - Check that the log level is a usable filter directive
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MinimizerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use tracing_subscriber::EnvFilter;

use crate::config::schema::MinimizerConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &MinimizerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(binary) = &config.executor.curl_binary {
        if binary.trim().is_empty() {
            errors.push(ValidationError::new("executor.curl_binary", "must not be empty"));
        }
    }

    if config.executor.retry_base_delay_ms > config.executor.retry_max_delay_ms {
        errors.push(ValidationError::new(
            "executor.retry_base_delay_ms",
            "must not exceed executor.retry_max_delay_ms",
        ));
    }

    let protected = [
        ("protect.headers", &config.protect.headers),
        ("protect.cookies", &config.protect.cookies),
        ("protect.params", &config.protect.params),
    ];
    for (field, names) in protected {
        if names.iter().any(|n| n.trim().is_empty()) {
            errors.push(ValidationError::new(field, "names must not be empty"));
        }
    }
    if config.protect.headers.iter().any(|h| h.contains(':')) {
        errors.push(ValidationError::new(
            "protect.headers",
            "header names must not contain ':'",
        ));
    }

    if EnvFilter::try_new(&config.observability.log_level).is_err() {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("invalid filter directive `{}`", config.observability.log_level),
        ));
    }

    if !config.reduce.headers && !config.reduce.cookies && !config.reduce.params {
        tracing::warn!("All reduction categories disabled; the command will be returned unchanged");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
