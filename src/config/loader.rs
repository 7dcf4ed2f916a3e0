//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GatewayConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gateway.toml");
        fs::write(
            &path,
            "[listener]\nbind_address = \"127.0.0.1:9000\"\n\n[ui]\ndir = \"/srv/ui\"\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.ui.dir, Path::new("/srv/ui"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_parse_and_validation_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gateway.toml");

        fs::write(&path, "[listener\n").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Parse(_))));

        fs::write(&path, "[admin]\nusername = \"\"\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: admin.username must not be empty");
    }
}
