//! Client configuration.
//!
//! The only required value is the backend base URL. It is resolved from, in
//! order: an explicit value (command-line flag), the `DESKBOT_API`
//! environment variable, and `~/.config/deskbot/config.toml`.

use crate::error::{DeskError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const API_ENV_VAR: &str = "DESKBOT_API";

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    /// Per-request timeout. Unset means requests may wait indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

/// Contents of `config.toml`; every field optional.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    base_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            request_timeout_secs: None,
        }
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    /// Resolves configuration from the flag, the environment and the default
    /// config file.
    pub fn resolve(flag: Option<String>) -> Result<Self> {
        let env = std::env::var(API_ENV_VAR).ok();
        let path = default_config_path();
        Self::resolve_with(flag, env, path.as_deref())
    }

    /// Same as [`resolve`](Self::resolve) with every source supplied.
    pub fn resolve_with(
        flag: Option<String>,
        env: Option<String>,
        config_path: Option<&Path>,
    ) -> Result<Self> {
        let file = match config_path {
            Some(path) if path.exists() => load_config_file(path)?,
            _ => ConfigFile::default(),
        };

        let base_url = flag
            .filter(|v| !v.trim().is_empty())
            .or_else(|| env.filter(|v| !v.trim().is_empty()))
            .or(file.base_url.filter(|v| !v.trim().is_empty()))
            .ok_or_else(|| {
                DeskError::config(format!(
                    "No backend URL configured: pass --api, set {} or add base_url to config.toml",
                    API_ENV_VAR
                ))
            })?;

        Ok(Self {
            base_url: normalize_base_url(&base_url),
            request_timeout_secs: file.request_timeout_secs,
        })
    }

    /// Joins an endpoint path (starting with `/`) onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Returns the path to the configuration file: ~/.config/deskbot/config.toml
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("deskbot").join("config.toml"))
}

fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        DeskError::config(format!(
            "Failed to read configuration file at {}: {}",
            path.display(),
            e
        ))
    })?;
    Ok(toml::from_str(&content)?)
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
