//! Configuration file loading with precedence handling.

use crate::render::{InvalidPalette, Palette};
use crate::state::{DEFAULT_COLLAPSE_WIDTH, DEFAULT_NOTICE_TTL};
use crate::view::ControllerOptions;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "CHANLOG_CONFIG";
/// Environment variable overriding the backend URL.
pub const BACKEND_URL_ENV: &str = "CHANLOG_BACKEND_URL";
/// Backend used when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:3030";
/// Request timeout used when nothing else is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A key parsed but its value is unusable.
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue {
        /// Offending key.
        key: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

impl From<InvalidPalette> for ConfigError {
    fn from(e: InvalidPalette) -> Self {
        ConfigError::InvalidValue {
            key: "palette",
            reason: e.to_string(),
        }
    }
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/chanlog/config.toml`.
///
/// ```toml
/// backend_url = "https://logs.example.org"
/// request_timeout_secs = 10
/// collapse_width = 720
/// notice_ttl_ms = 5000
/// palette = ["#7b8d43", "#ada63e"]
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Base URL of the log server.
    #[serde(default)]
    pub backend_url: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Viewport width below which the controls collapse.
    #[serde(default)]
    pub collapse_width: Option<u32>,

    /// Notice lifetime in milliseconds.
    #[serde(default)]
    pub notice_ttl_ms: Option<u64>,

    /// Author colors.
    #[serde(default)]
    pub palette: Option<Vec<String>>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Base URL of the log server.
    pub backend_url: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Collapse threshold in pixels.
    pub collapse_width: u32,
    /// Notice lifetime.
    pub notice_ttl: Duration,
    /// Author colors.
    pub palette: Palette,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            collapse_width: DEFAULT_COLLAPSE_WIDTH,
            notice_ttl: DEFAULT_NOTICE_TTL,
            palette: Palette::default(),
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Controller tunables taken from this config.
    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            palette: self.palette.clone(),
            collapse_width: self.collapse_width,
            notice_ttl: self.notice_ttl,
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/chanlog/chanlog.log` on Linux, the platform
/// equivalent elsewhere, or `chanlog.log` in the working directory when no
/// state directory exists (macOS, Windows).
pub fn default_log_path() -> PathBuf {
    match dirs::state_dir() {
        Some(state_dir) => state_dir.join("chanlog").join("chanlog.log"),
        None => PathBuf::from("chanlog.log"),
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path (`~/.config/chanlog/config.toml` on Unix).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("chanlog").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `CHANLOG_CONFIG` environment variable
/// 3. Default path `~/.config/chanlog/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    match default_config_path() {
        Some(default_path) => load_config_file(default_path),
        None => Ok(None),
    }
}

/// Merge config file into defaults to create resolved config.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for an empty or unsafe palette, a
/// zero timeout, or a zero collapse width.
pub fn merge_config(config_file: Option<ConfigFile>) -> Result<ResolvedConfig, ConfigError> {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return Ok(defaults);
    };

    let request_timeout = match config.request_timeout_secs {
        Some(0) => {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout_secs",
                reason: "must be at least 1".into(),
            })
        }
        Some(secs) => Duration::from_secs(secs),
        None => defaults.request_timeout,
    };

    let collapse_width = match config.collapse_width {
        Some(0) => {
            return Err(ConfigError::InvalidValue {
                key: "collapse_width",
                reason: "must be at least 1".into(),
            })
        }
        Some(width) => width,
        None => defaults.collapse_width,
    };

    let palette = match config.palette {
        Some(colors) => Palette::new(colors)?,
        None => defaults.palette,
    };

    Ok(ResolvedConfig {
        backend_url: config.backend_url.unwrap_or(defaults.backend_url),
        request_timeout,
        collapse_width,
        notice_ttl: config
            .notice_ttl_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.notice_ttl),
        palette,
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    })
}

/// Apply environment variable overrides (`CHANLOG_BACKEND_URL`).
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
        config.backend_url = url;
    }

    config
}

/// Apply CLI argument overrides to resolved config.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    backend_override: Option<String>,
    log_file_override: Option<PathBuf>,
) -> ResolvedConfig {
    if let Some(url) = backend_override {
        config.backend_url = url;
    }

    if let Some(path) = log_file_override {
        config.log_file_path = path;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
