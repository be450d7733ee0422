//! Configuration Management
//!
//! Handles persistent configuration storage for halnav.

use crate::client::http::{HttpOptions, DEFAULT_ACCEPT};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// User configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// API root used when no URL is given on the command line
    #[serde(default)]
    pub root_url: Option<String>,
    /// User-Agent header sent with every request
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Accept header sent with every request
    #[serde(default)]
    pub accept: Option<String>,
    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("halnav").join("config.json"))
    }

    /// Load configuration from disk, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        Self::load_from(&path)
    }

    /// Load configuration from `path`; a missing or unreadable file gives defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|err| {
                tracing::warn!("ignoring invalid config {:?}: {}", path, err);
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
        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Get effective root URL (CLI > config)
    pub fn effective_root_url(&self, cli: Option<&str>) -> Option<String> {
        cli.map(str::to_string).or_else(|| self.root_url.clone())
    }

    /// Request options with built-in defaults filled in
    pub fn http_options(&self) -> HttpOptions {
        let defaults = HttpOptions::default();
        HttpOptions {
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
            accept: self
                .accept
                .clone()
                .unwrap_or_else(|| DEFAULT_ACCEPT.to_string()),
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }

    /// Set root URL and save
    pub fn set_root_url(&mut self, url: &str) -> Result<()> {
        self.root_url = Some(url.to_string());
        self.save()
    }
}
