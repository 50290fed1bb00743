//! Server configuration types
//!
//! Configuration is loaded from an optional TOML file; every field has
//! a default so an empty file (or none at all) yields a working local
//! setup. CLI flags override file values after loading.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    /// Directory holding the results database (default `./data`)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Explicit database file path; takes precedence over `data_dir`
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    #[serde(default)]
    pub monitor: MonitorAppConfig,
    #[serde(default)]
    pub prober: ProberConfig,
}

impl AppConfig {
    /// Load configuration from an optional TOML file
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = fs::read_to_string(path).with_context(|| {
                    format!("failed to read config file {}", path.display())
                })?;
                toml::from_str(&content).with_context(|| {
                    format!("failed to parse config file {}", path.display())
                })
            }
            None => Ok(Self::default()),
        }
    }

    /// Reject values that cannot run
    ///
    /// A zero interval would turn the monitor into a hot loop.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.monitor.interval_secs >= 1,
            "monitor.interval_secs must be at least 1"
        );
        Ok(())
    }

    /// Resolve the SQLite database path
    pub fn resolved_db_path(&self) -> PathBuf {
        match &self.db_path {
            Some(path) => path.clone(),
            None => self
                .data_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from("./data"))
                .join("speedtest_results.db"),
        }
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Background monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorAppConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between measurement cycle starts
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for MonitorAppConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: default_interval_secs(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_interval_secs() -> u64 {
    60
}

/// Prober configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProberConfig {
    /// Executable invoked for each measurement
    #[serde(default = "default_prober_command")]
    pub command: String,
}

impl Default for ProberConfig {
    fn default() -> Self {
        Self {
            command: default_prober_command(),
        }
    }
}

fn default_prober_command() -> String {
    "speedtest-cli".to_string()
}
