//! Configuration Management
//!
//! Handles persistent configuration storage for evgrid.

use crate::arm::{ClientOptions, DEFAULT_BASE_URI};
use crate::eventgrid::DEFAULT_API_VERSION;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable consulted when no subscription is configured
pub const SUBSCRIPTION_ENV: &str = "AZURE_SUBSCRIPTION_ID";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Default Azure subscription
    #[serde(default)]
    pub subscription_id: Option<String>,
    /// Management endpoint override (sovereign clouds, test servers)
    #[serde(default)]
    pub base_uri: Option<String>,
    /// API version override
    #[serde(default)]
    pub api_version: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Retries on throttling and transient server errors
    #[serde(default)]
    pub max_retries: Option<u32>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("evgrid").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from a specific file; missing or unreadable files
    /// yield the defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Get effective subscription (CLI > config > environment)
    pub fn effective_subscription(&self, cli: Option<&str>) -> Option<String> {
        cli.map(str::to_string)
            .or_else(|| self.subscription_id.clone())
            .or_else(|| std::env::var(SUBSCRIPTION_ENV).ok())
            .filter(|s| !s.is_empty())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Build the immutable client options for this configuration
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions::new(
            self.base_uri.as_deref().unwrap_or(DEFAULT_BASE_URI),
            self.api_version.as_deref().unwrap_or(DEFAULT_API_VERSION),
        )
    }

    /// Set subscription and save
    pub fn set_subscription(&mut self, subscription_id: &str) -> Result<()> {
        self.subscription_id = Some(subscription_id.to_string());
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("evgrid-config-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = Config::load_from(&temp_path("does-not-exist.json"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("roundtrip.json");
        let config = Config {
            subscription_id: Some("abc".to_string()),
            max_retries: Some(1),
            ..Default::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), config);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let path = temp_path("corrupt.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();

        assert_eq!(Config::load_from(&path), Config::default());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_client_options_defaults() {
        let options = Config::default().client_options();
        assert_eq!(options.base_uri(), "https://management.azure.com");
        assert_eq!(options.api_version(), "2020-10-15-preview");
    }

    #[test]
    fn test_cli_subscription_wins() {
        let config = Config {
            subscription_id: Some("from-config".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.effective_subscription(Some("from-cli")).as_deref(),
            Some("from-cli")
        );
        assert_eq!(
            config.effective_subscription(None).as_deref(),
            Some("from-config")
        );
    }
}
