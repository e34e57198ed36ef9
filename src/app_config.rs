use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};

use crate::lexicon_code::LexiconCode;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Database settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// REST API behaviour
    #[serde(default)]
    pub api: ApiConfig,

    /// Import tooling settings
    #[serde(default)]
    pub import: ImportConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Database configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    // @field: SQLite file path, platform data dir when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// HTTP server configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    // @field: Bind address
    #[serde(default = "default_host")]
    pub host: String,

    // @field: Bind port
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

/// REST API configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiConfig {
    /// Page size when the request has no `limit`
    #[serde(default = "default_page_limit")]
    pub default_limit: usize,

    /// Upper bound for `limit`
    #[serde(default = "default_max_page_limit")]
    pub max_limit: usize,

    /// Minimum similarity (0.0 to 1.0) for the `near` action
    #[serde(default = "default_near_threshold")]
    pub near_threshold: f64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            default_limit: default_page_limit(),
            max_limit: default_max_page_limit(),
            near_threshold: default_near_threshold(),
        }
    }
}

/// Import tooling configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ImportConfig {
    /// Stop collecting row errors after this many
    #[serde(default = "default_max_errors")]
    pub max_errors: usize,

    /// Office suite binary used for xlsx to ods conversion
    #[serde(default = "default_office_command")]
    pub office_command: String,

    /// Lexicon used by the upload validators when the request names none
    #[serde(default = "default_lexicon")]
    pub default_lexicon: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_errors: default_max_errors(),
            office_command: default_office_command(),
            default_lexicon: default_lexicon(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Map to the `log` crate filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_page_limit() -> usize {
    30
}

fn default_max_page_limit() -> usize {
    100
}

fn default_near_threshold() -> f64 {
    0.3
}

fn default_max_errors() -> usize {
    100
}

fn default_office_command() -> String {
    "libreoffice".to_string()
}

fn default_lexicon() -> String {
    "es-ar".to_string()
}

impl Config {
    /// Load the configuration from a JSON file, writing the defaults when the file is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            return Ok(config);
        }

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {:?}", path))?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.api.default_limit == 0 || self.api.max_limit == 0 {
            return Err(anyhow!("Page limits must be greater than zero"));
        }

        if self.api.default_limit > self.api.max_limit {
            return Err(anyhow!(
                "Default page limit ({}) exceeds the maximum ({})",
                self.api.default_limit,
                self.api.max_limit
            ));
        }

        if !(0.0..=1.0).contains(&self.api.near_threshold) {
            return Err(anyhow!("Near threshold must be between 0.0 and 1.0"));
        }

        if self.import.max_errors == 0 {
            return Err(anyhow!("Import max_errors must be greater than zero"));
        }

        if self.server.host.trim().is_empty() {
            return Err(anyhow!("Server host is required"));
        }

        self.import
            .default_lexicon
            .parse::<LexiconCode>()
            .context("Invalid default lexicon")?;

        Ok(())
    }
}
