//! Configuration management for AirdropHunter

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::CacheWindows;
use crate::client::http::DEFAULT_TIMEOUT;
use crate::error::{ConfigError, Result};

/// Default API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://airdrophunter.app";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the site serving `/api/airdrops`
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Feed and output preferences
    #[serde(default)]
    pub preferences: Preferences,
}

/// Feed and output preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Items per page requested from the listing endpoint
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Age after which cached data is considered stale
    #[serde(default = "default_stale_after_secs")]
    pub stale_after_secs: u64,

    /// Per-request timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Refresh stale cache in the background after serving it
    #[serde(default = "default_true")]
    pub background_refresh: bool,

    /// Delay before the background refresh fires
    #[serde(default = "default_background_delay_ms")]
    pub background_delay_ms: u64,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_page_size() -> usize {
    12
}

fn default_stale_after_secs() -> u64 {
    CacheWindows::AIRDROPS_STALE.as_secs()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_true() -> bool {
    true
}

fn default_background_delay_ms() -> u64 {
    1000
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            format: None,
            page_size: default_page_size(),
            stale_after_secs: default_stale_after_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            background_refresh: default_true(),
            background_delay_ms: default_background_delay_ms(),
        }
    }
}

impl Preferences {
    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn background_delay(&self) -> Duration {
        Duration::from_millis(self.background_delay_ms)
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".airdrophunter").join("config.yaml"))
    }

    /// Resolve an optional override against the default location
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration, falling back to defaults when no file exists
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        Self::load_from(&Self::resolve_path(path)?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to an optional override or the default path
    pub fn save_at(&self, path: Option<&str>) -> Result<()> {
        self.save_to(&Self::resolve_path(path)?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(path, contents)?;

        // Set file permissions to 600 on Unix systems
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// Reject values the feed cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"))
        {
            return Err(ConfigError::Invalid(format!(
                "api_base_url must start with http:// or https:// (got '{}')",
                self.api_base_url
            ))
            .into());
        }
        if self.preferences.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be at least 1".to_string()).into());
        }
        if self.preferences.request_timeout_secs == 0 {
            return Err(
                ConfigError::Invalid("request_timeout_secs must be at least 1".to_string()).into(),
            );
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            preferences: Preferences::default(),
        }
    }
}
