//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Store backends understood by the application.
pub const STORE_BACKENDS: [&str; 2] = ["sqlite", "memory"];

/// Log levels accepted in `logging.level`.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Job record store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend type ("sqlite" or "memory").
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Database file for the sqlite backend.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: default_store_path(),
        }
    }
}

fn default_backend() -> String {
    "sqlite".to_string()
}

/// Base directory for application data: `~/.crm-jobs`.
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".crm-jobs"))
        .unwrap_or_else(|| PathBuf::from(".crm-jobs"))
}

fn default_store_path() -> PathBuf {
    default_data_dir().join("jobs.db")
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter level; `RUST_LOG` takes precedence.
    #[serde(default = "default_level")]
    pub level: String,

    /// Directory for daily-rotated log files. Console only when unset.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            directory: None,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
