//! Runtime configuration.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::image::DEFAULT_FALLBACK_IMAGE_URL;
use crate::state::store::DEFAULT_STATS_FILE;
use crate::state::GameRules;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuessConfig {
    /// Where the registry is persisted
    pub stats_path: PathBuf,

    /// Optional text catalog overriding the built-in captions
    pub texts_path: Option<PathBuf>,

    pub fallback_image_url: String,

    pub rules: GameRules,
}

impl Default for GuessConfig {
    fn default() -> Self {
        Self {
            stats_path: PathBuf::from(DEFAULT_STATS_FILE),
            texts_path: None,
            fallback_image_url: DEFAULT_FALLBACK_IMAGE_URL.to_string(),
            rules: GameRules::default(),
        }
    }
}

impl GuessConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: GuessConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let rules = &self.rules;
        if rules.max_attempts == 0 {
            return Err(ConfigError::invalid("max_attempts must be at least 1"));
        }
        if rules.secret_min > rules.secret_max {
            return Err(ConfigError::invalid(format!(
                "secret range {}..={} is empty",
                rules.secret_min, rules.secret_max
            )));
        }
        if rules.leaderboard_size == 0 {
            return Err(ConfigError::invalid("leaderboard_size must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_default_is_valid() {
        let config = GuessConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.stats_path, PathBuf::from("stats.json"));
        assert_eq!(config.rules.max_attempts, 5);
    }

    #[test]
    fn test_load_partial() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "stats_path": "data/users.json", "rules": { "max_attempts": 7 } }"#,
        )
        .unwrap();

        let config = GuessConfig::load(&path).unwrap();
        assert_eq!(config.stats_path, PathBuf::from("data/users.json"));
        assert_eq!(config.rules.max_attempts, 7);
        assert_eq!(config.rules.secret_max, 100);
        assert_eq!(config.fallback_image_url, DEFAULT_FALLBACK_IMAGE_URL);
    }

    #[test]
    fn test_rejects_empty_range() {
        let mut config = GuessConfig::default();
        config.rules.secret_min = 50;
        config.rules.secret_max = 10;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let result = GuessConfig::load(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
