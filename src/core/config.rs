//! Configuration for the collection store
//!
//! Settings come from a TOML file, then `CS_*` environment variables, then
//! command line flags (applied by the binary). Every section has defaults so an
//! empty file, or no file at all, is a valid configuration.

use crate::core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "collection-store.toml";

/// How mutating operations share the backing file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// One read-modify-write at a time, in-process
    Serialized,
    /// No coordination; concurrent writers can lose updates
    Unguarded,
}

impl std::str::FromStr for WriteMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "serialized" => Ok(WriteMode::Serialized),
            "unguarded" => Ok(WriteMode::Unguarded),
            other => Err(Error::config(format!(
                "Invalid write mode: {}. Valid options: serialized, unguarded",
                other
            ))),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line human readable output
    Pretty,
    /// Single-line human readable output
    Compact,
    /// Newline-delimited JSON
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(Error::config(format!(
                "Invalid log format: {}. Valid options: pretty, compact, json",
                other
            ))),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Static file serving (disabled when absent)
    #[serde(default)]
    pub static_files: Option<StaticFilesConfig>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server bind address
    #[serde(default = "default_http_addr")]
    pub http_addr: SocketAddr,

    /// Path prefix the collection routes are mounted under
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Reject `POST` requests that carry no body
    #[serde(default = "default_require_body")]
    pub require_body: bool,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON document holding every collection
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Coordination between concurrent mutations
    #[serde(default = "default_write_mode")]
    pub write_mode: WriteMode,
}

/// Static file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticFilesConfig {
    /// Directory served for routes outside the API
    pub dir: PathBuf,

    /// Serve `index.html` for unknown paths
    #[serde(default = "default_spa_fallback")]
    pub spa_fallback: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (pretty, compact, json)
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            api_prefix: default_api_prefix(),
            require_body: default_require_body(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            write_mode: default_write_mode(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Default value functions for serde
fn default_http_addr() -> SocketAddr { SocketAddr::from(([0, 0, 0, 0], 8080)) }
fn default_api_prefix() -> String { "/api".to_string() }
fn default_require_body() -> bool { true }
fn default_data_file() -> PathBuf { PathBuf::from("./data/db.json") }
fn default_write_mode() -> WriteMode { WriteMode::Serialized }
fn default_spa_fallback() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> LogFormat { LogFormat::Pretty }

impl Config {
    /// Load configuration: file (explicit, or the default file if present),
    /// then environment overrides, then validation.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE)?,
            None => Config::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config file {:?}: {}", path, e)))?;

        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| Error::config(format!("Failed to parse config file: {}", e)))
    }

    /// Apply `CS_*` overrides. `lookup` resolves a variable name to its value.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("CS_HTTP_ADDR") {
            self.server.http_addr = addr.parse()
                .map_err(|e| Error::config(format!("Invalid HTTP address: {}", e)))?;
        }

        if let Some(prefix) = lookup("CS_API_PREFIX") {
            self.server.api_prefix = prefix;
        }

        if let Some(data_file) = lookup("CS_DATA_FILE") {
            self.storage.data_file = PathBuf::from(data_file);
        }

        if let Some(mode) = lookup("CS_WRITE_MODE") {
            self.storage.write_mode = mode.parse()?;
        }

        if let Some(dir) = lookup("CS_STATIC_DIR") {
            self.set_static_dir(dir);
        }

        if let Some(level) = lookup("CS_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(format) = lookup("CS_LOG_FORMAT") {
            self.logging.format = format.parse()?;
        }

        Ok(())
    }

    /// Point static serving at `dir`, keeping any configured fallback setting
    pub fn set_static_dir(&mut self, dir: impl Into<PathBuf>) {
        match self.static_files.as_mut() {
            Some(static_files) => static_files.dir = dir.into(),
            None => {
                self.static_files = Some(StaticFilesConfig {
                    dir: dir.into(),
                    spa_fallback: default_spa_fallback(),
                })
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let prefix = &self.server.api_prefix;
        if !prefix.starts_with('/') || prefix.ends_with('/') {
            return Err(Error::config(format!(
                "API prefix must start with '/' and must not end with '/': {:?}",
                prefix
            )));
        }

        if self.storage.data_file.file_name().is_none() {
            return Err(Error::config(format!(
                "Data file path does not name a file: {:?}",
                self.storage.data_file
            )));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {},
            other => return Err(Error::config(format!("Invalid log level: {}", other))),
        }

        Ok(())
    }
}
