//! Configuration management for butteryop

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::storage::DEFAULT_CAPACITY_BYTES;
use crate::client::buttery::DEFAULT_API_HOST;
use crate::error::{ConfigError, Result};
use crate::sync::RetryPolicy;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Backend host, without the `/api` suffix
    #[serde(default = "default_api_host")]
    pub api_host: String,

    /// Session cookie obtained after CAS login
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,

    /// Default buttery filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttery: Option<String>,

    /// Background sync settings
    #[serde(default)]
    pub sync: SyncSettings,

    /// Local cache settings
    #[serde(default)]
    pub cache: CacheSettings,
}

fn default_api_host() -> String {
    DEFAULT_API_HOST.to_string()
}

/// Retry schedule for optimistic updates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Seconds to wait before each retry
    #[serde(default = "default_retry_delays")]
    pub retry_delays_secs: Vec<u64>,
}

fn default_retry_delays() -> Vec<u64> {
    vec![10, 20, 30]
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            retry_delays_secs: default_retry_delays(),
        }
    }
}

/// Limits for the local cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Entries older than this are ignored
    #[serde(default = "default_max_age_hours")]
    pub max_age_hours: u64,

    /// Total storage budget in bytes
    #[serde(default = "default_max_value_bytes")]
    pub max_value_bytes: usize,
}

fn default_max_age_hours() -> u64 {
    24
}

fn default_max_value_bytes() -> usize {
    DEFAULT_CAPACITY_BYTES
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_age_hours: default_max_age_hours(),
            max_value_bytes: default_max_value_bytes(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_host: default_api_host(),
            session: None,
            buttery: None,
            sync: SyncSettings::default(),
            cache: CacheSettings::default(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".butteryop").join("config.yaml"))
    }

    /// Explicit path if given, otherwise the default location
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load from `path` (or the default location). A missing file yields
    /// the defaults.
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        Self::load_from(Self::resolve_path(path)?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;
        config.validate()?;

        Ok(config)
    }

    /// Save to `path` (or the default location)
    pub fn save_at(&self, path: Option<&str>) -> Result<()> {
        self.save_to(Self::resolve_path(path)?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(&path, contents)?;

        // The file holds the session cookie
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    /// Reject values that cannot work
    pub fn validate(&self) -> Result<()> {
        if !(self.api_host.starts_with("http://") || self.api_host.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api_host must start with http:// or https:// (got {})",
                self.api_host
            ))
            .into());
        }
        if self.cache.max_age_hours == 0 {
            return Err(ConfigError::Invalid("cache.max_age_hours must be at least 1".to_string()).into());
        }
        Ok(())
    }

    /// The session cookie, for commands that talk to the backend as a user
    pub fn require_session(&self) -> Result<&str> {
        self.session
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingSession.into())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from_secs(&self.sync.retry_delays_secs)
    }

    pub fn cache_max_age(&self) -> Duration {
        Duration::from_secs(self.cache.max_age_hours.saturating_mul(60 * 60))
    }
}
