// SPDX-License-Identifier: Apache-2.0

//! Configuration management for ghdesk.
//!
//! Provides layered configuration from files and environment variables.
//! Uses XDG-compliant paths with environment variable support.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables (prefix: `GHDESK_`)
//! 2. Config file: `~/.config/ghdesk/config.toml`
//! 3. Built-in defaults
//!
//! # Examples
//!
//! ```bash
//! # Point the server at a GitHub Enterprise instance
//! GHDESK_GITHUB__API_BASE_URL=https://ghe.example.com/api/v3 ghdesk-mcp
//! ```

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::GhDeskError;

/// Default GitHub REST API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// GitHub API settings.
    pub github: GitHubConfig,
}

/// GitHub API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// REST API base URL, without trailing slash.
    pub api_base_url: String,
    /// Per-request timeout in seconds.
    pub api_timeout_seconds: u64,
    /// Value sent in the `User-Agent` header.
    pub user_agent: String,
    /// Page size used when a listing request does not specify one.
    pub default_per_page: u32,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_timeout_seconds: 30,
            user_agent: concat!("ghdesk/", env!("CARGO_PKG_VERSION")).to_string(),
            default_per_page: 30,
        }
    }
}

/// Returns the ghdesk configuration directory.
///
/// Respects the `XDG_CONFIG_HOME` environment variable if set,
/// otherwise defaults to `~/.config/ghdesk`.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        return PathBuf::from(xdg_config).join("ghdesk");
    }
    dirs::home_dir()
        .map(|home| home.join(".config"))
        .or_else(dirs::config_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ghdesk")
}

/// Returns the path to the configuration file.
#[must_use]
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Load application configuration from the default file location.
///
/// Environment variables use the prefix `GHDESK_` and double underscore
/// for nested keys (e.g., `GHDESK_GITHUB__API_TIMEOUT_SECONDS`).
///
/// # Errors
///
/// Returns `GhDeskError::Config` if the config file exists but is invalid.
pub fn load_config() -> Result<AppConfig, GhDeskError> {
    load_config_from(&config_file_path())
}

/// Load application configuration from an explicit file path.
///
/// The file is optional; a missing file yields defaults plus environment
/// overrides.
///
/// # Errors
///
/// Returns `GhDeskError::Config` if the file or environment values are invalid.
pub fn load_config_from(path: &Path) -> Result<AppConfig, GhDeskError> {
    let config = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix("GHDESK")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let mut app_config: AppConfig = config.try_deserialize()?;
    let trimmed = app_config.github.api_base_url.trim_end_matches('/').len();
    app_config.github.api_base_url.truncate(trimmed);

    Ok(app_config)
}
