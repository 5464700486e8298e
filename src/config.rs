//! Client configuration

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::BadStatusPolicy;

/// Overrides the app directory (config and session files).
pub const APP_DIR_ENV: &str = "ANNOTATRON_HOME";

pub const CONFIG_FILE: &str = "config.toml";

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000/annotatron/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot determine a config directory; set ANNOTATRON_HOME")]
    NoConfigDir,

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the Annotatron API.
    pub server_url: String,
    /// Per-request timeout for the HTTP client.
    pub timeout_secs: u64,
    pub bad_status_policy: BadStatusPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            timeout_secs: 30,
            bad_status_policy: BadStatusPolicy::default(),
        }
    }
}

impl Config {
    /// Read `config.toml` from `app_dir`; a missing file yields defaults.
    pub fn load(app_dir: &Path) -> Result<Self, ConfigError> {
        let path = app_dir.join(CONFIG_FILE);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Directory holding `config.toml` and the session file.
pub fn app_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var(APP_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(base.join("annotatron"))
}
