mod layout_config;

pub use layout_config::LayoutConfig;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::user::UserId;

pub const DATABASE_URL_ENV: &str = "MINDFLOW_DATABASE_URL";
pub const USER_ENV: &str = "MINDFLOW_USER";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MindFlowConfig {
    /// SQLite connection string for the task store
    pub database_url: String,

    /// Identity the desktop app signs in as
    pub user_id: String,

    /// Default tracing filter, used when RUST_LOG is unset
    pub log_filter: String,

    /// Days moved by the date navigator's previous/next buttons
    pub date_stride_days: u32,

    pub layout: LayoutConfig,
}

impl Default for MindFlowConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:mindflow.db".to_string(),
            user_id: "local".to_string(),
            log_filter: "mindflow=info,warn".to_string(),
            date_stride_days: 5,
            layout: LayoutConfig::default(),
        }
    }
}

impl MindFlowConfig {
    /// Load configuration from the user config directory, writing the
    /// defaults there on first run. Environment overrides apply last.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
            default_config
        };

        Ok(config.with_env_overrides())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        info!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("mindflow").join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            anyhow::bail!("user_id must not be empty");
        }
        if self.date_stride_days == 0 {
            anyhow::bail!("date_stride_days must be at least 1");
        }
        self.layout.validate()
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(DATABASE_URL_ENV).ok(),
            std::env::var(USER_ENV).ok(),
        )
    }

    fn with_overrides(mut self, database_url: Option<String>, user_id: Option<String>) -> Self {
        if let Some(url) = database_url.filter(|u| !u.trim().is_empty()) {
            self.database_url = url;
        }
        if let Some(user) = user_id.filter(|u| !u.trim().is_empty()) {
            self.user_id = user;
        }
        self
    }

    pub fn user(&self) -> UserId {
        UserId::new(self.user_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let config = MindFlowConfig::from_toml_str(
            r#"
            user_id = "jay"

            [layout]
            task_spread = 0.4
            "#,
        )
        .unwrap();

        assert_eq!(config.user_id, "jay");
        assert_eq!(config.date_stride_days, 5);
        assert_eq!(config.layout.task_spread, 0.4);
        assert_eq!(config.layout.category_distance, 180.0);
    }

    #[test]
    fn test_invalid_layout_is_rejected() {
        let result = MindFlowConfig::from_toml_str(
            r#"
            [layout]
            min_zoom = 1.5
            max_zoom = 1.0
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = MindFlowConfig {
            user_id: "someone".to_string(),
            date_stride_days: 7,
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        let loaded = MindFlowConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_overrides_ignore_blank_values() {
        let config = MindFlowConfig::default()
            .with_overrides(Some("sqlite::memory:".to_string()), Some("  ".to_string()));
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.user_id, "local");
        assert_eq!(config.user().as_str(), "local");
    }
}
