//! Client configuration.
//!
//! Configuration is stored in `.boardlens/config.yaml` and includes:
//! - Server base URL
//! - Authentication token (overridable via `BOARDLENS_TOKEN`)
//! - Page size for history listings
//! - Remote operation timeout

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::{HistoryError, Result};

pub const CONFIG_DIR: &str = ".boardlens";
pub const CONFIG_FILE: &str = "config.yaml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Detection server base URL (default: http://localhost:8080/)
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Authentication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,

    /// Records per history page (default: 20, fixed per session)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Remote operation timeout in seconds (default: 30)
    #[serde(default = "default_remote_timeout")]
    pub remote_timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            auth: None,
            page_size: default_page_size(),
            remote_timeout: default_remote_timeout(),
        }
    }
}

fn default_server_url() -> String {
    "http://localhost:8080/".to_string()
}

fn default_page_size() -> u32 {
    20
}

fn default_remote_timeout() -> u64 {
    30
}

/// Authentication configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub token: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl Config {
    /// Load from the default location, falling back to defaults when no
    /// config file exists. `BOARDLENS_CONFIG` overrides the path;
    /// `BOARDLENS_URL` overrides the server URL.
    pub fn load() -> Result<Self> {
        let config = match env::var("BOARDLENS_CONFIG") {
            Ok(path) => Self::load_from(Path::new(&path))?,
            Err(_) => {
                let path = Self::default_path();
                if path.exists() {
                    Self::load_from(&path)?
                } else {
                    Self::default()
                }
            }
        };
        Ok(config.with_env_overrides())
    }

    /// Load from an explicit file path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            HistoryError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Persist to an explicit file path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_yaml_ng::to_string(self)
            .map_err(|e| HistoryError::Config(format!("cannot serialize config: {e}")))?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> PathBuf {
        PathBuf::from(CONFIG_DIR).join(CONFIG_FILE)
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Auth token: `BOARDLENS_TOKEN` wins over the config file.
    pub fn token(&self) -> Option<SecretString> {
        if let Ok(token) = env::var("BOARDLENS_TOKEN")
            && !token.is_empty()
        {
            return Some(SecretString::from(token));
        }
        self.auth
            .as_ref()
            .map(|auth| SecretString::from(auth.token.clone()))
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout)
    }

    /// Apply environment overrides that replace file values wholesale.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = env::var("BOARDLENS_URL")
            && !url.is_empty()
        {
            self.server_url = url;
        }
        self
    }

    /// Set a config value by dotted key, for `boardlens config set`.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "server.url" => self.server_url = value.to_string(),
            "auth.token" => {
                self.auth = Some(AuthConfig {
                    token: value.to_string(),
                });
            }
            "page_size" => {
                let size: u32 = value.parse().map_err(|_| {
                    HistoryError::Config(format!("page_size must be a positive integer, got '{value}'"))
                })?;
                if size == 0 {
                    return Err(HistoryError::Config(
                        "page_size must be greater than zero".to_string(),
                    ));
                }
                self.page_size = size;
            }
            "remote_timeout" => {
                self.remote_timeout = value.parse().map_err(|_| {
                    HistoryError::Config(format!("remote_timeout must be seconds, got '{value}'"))
                })?;
            }
            _ => {
                return Err(HistoryError::Config(format!(
                    "unknown config key '{key}' (valid: server.url, auth.token, page_size, remote_timeout)"
                )));
            }
        }
        Ok(())
    }
}
