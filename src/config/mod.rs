//! Persistent user preferences: the daily goal and the ledger retention policy.

use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::{
    ledger::DailyGoal,
    storage::RetentionPolicy,
    utils::paths::{ensure_dir, PathResolver},
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub daily_goal_ml: DailyGoal,
    pub retention: RetentionPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            daily_goal_ml: DailyGoal::default(),
            retention: RetentionPolicy::KeepAll,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retention == RetentionPolicy::KeepDays(0) {
            return Err(ConfigError::Invalid(
                "retention must keep at least one day".into(),
            ));
        }
        Ok(())
    }
}

/// Handles persistence of [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigManager {
    base: PathBuf,
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        let config_path = PathResolver::config_file_in(&base);
        Ok(Self { base, config_path })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Loads the stored configuration, falling back to defaults when none exists.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.config_path)?;
        let config: Config =
            serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.daily_goal_ml.milliliters(), 2000);
    }

    #[test]
    fn stored_values_are_loaded() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(
            manager.config_path(),
            r#"{ "daily_goal_ml": 2500, "retention": { "mode": "keep_days", "days": 90 } }"#,
        )
        .unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.daily_goal_ml.milliliters(), 2500);
        assert_eq!(config.retention, RetentionPolicy::KeepDays(90));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.config_path(), r#"{ "daily_goal_ml": 1800 }"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.daily_goal_ml.milliliters(), 1800);
        assert_eq!(config.retention, RetentionPolicy::KeepAll);
    }

    #[test]
    fn zero_goal_is_rejected() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.config_path(), r#"{ "daily_goal_ml": 0 }"#).unwrap();
        assert!(matches!(manager.load(), Err(ConfigError::Serde(_))));
    }

    #[test]
    fn zero_day_retention_is_rejected() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(
            manager.config_path(),
            r#"{ "retention": { "mode": "keep_days", "days": 0 } }"#,
        )
        .unwrap();
        assert!(matches!(manager.load(), Err(ConfigError::Invalid(_))));
    }
}
