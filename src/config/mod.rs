//! Configuration management for floorterm
//!
//! The config file is a flat key/value document. Every key is optional;
//! "unset" is a valid state for each of them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::session::AuthToken;

/// Server used when none has been configured
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080/";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Backend base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,

    /// Employee identifier used by the last successful clock operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_employee_id: Option<String>,

    /// Persisted session token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<AuthToken>,

    /// Shell command that prints a fresh token on stdout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_command: Option<String>,
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".floorterm").join("config.yaml"))
    }

    /// Resolve an optional override to a concrete path
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }

        let contents = std::fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Load configuration from a specific path, or defaults if it does not exist
    pub fn load_or_default_from(path: &Path) -> Result<Self> {
        match Self::load_from(path) {
            Err(crate::error::Error::Config(ConfigError::NotFound)) => Ok(Self::default()),
            other => other,
        }
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(path, contents)?;

        // Tokens live here, keep it private
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// Configured server URL, or the default placeholder
    pub fn server_url_or_default(&self) -> &str {
        self.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }
}
