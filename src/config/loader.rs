//! Configuration loading from disk.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::MinimizerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Why a configuration file could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file")]
    Io(#[from] io::Error),

    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ValidationError::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<MinimizerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: MinimizerConfig = toml::from_str(&content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::debug!(path = %path.display(), "Configuration file loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[reduce]\ncookies = false\n\n[protect]\nparams = [\"token\"]").unwrap();

        let config = load_config(file.path()).unwrap();
        assert!(!config.reduce.cookies);
        assert_eq!(config.protect.params, vec!["token"]);
    }

    #[test]
    fn test_load_rejects_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[executor]\ncurl_binary = \"\"").unwrap();
        assert!(matches!(load_config(file.path()), Err(ConfigError::Validation(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[reduce\nheaders = 1").unwrap();
        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/curlmin.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_validation_message_lists_every_problem() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[executor]\nretry_base_delay_ms = 5000\nretry_max_delay_ms = 10\n\n[protect]\nheaders = [\"\"]"
        )
        .unwrap();
        let message = load_config(file.path()).unwrap_err().to_string();
        assert!(message.starts_with("invalid configuration: "));
        assert!(message.contains("executor.retry_base_delay_ms"));
        assert!(message.contains("protect.headers"));
    }
}
