//! Configuration loading and layering
//!
//! Resolution priority (highest first):
//! 1. Command-line arguments (and their `REELBASE_*` environment fallbacks)
//! 2. TOML config file
//! 3. Built-in defaults
//!
//! The TOML file is optional. Its location is `REELBASE_CONFIG` if set,
//! otherwise `<config_dir>/reelbase/config.toml` when that file exists.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "REELBASE_CONFIG";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 9292;
pub const DEFAULT_DATABASE_NAME: &str = "denzel";
pub const DEFAULT_METASCORE_THRESHOLD: i64 = 70;
pub const DEFAULT_SUBJECT_ID: &str = "nm0000243";
pub const DEFAULT_MAX_SEARCH_LIMIT: i64 = 100;
pub const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 30;

/// Bootstrap configuration as read from TOML
///
/// Every field is optional so a partial file only overrides what it names.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    #[serde(default)]
    pub database: DatabaseSection,
    #[serde(default)]
    pub catalog: CatalogSection,
    #[serde(default)]
    pub source: SourceSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseSection {
    /// Full connection string; derived from `name` when absent
    pub url: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogSection {
    /// Metascore a movie must exceed to be a "must-watch"
    pub metascore_threshold: Option<i64>,
    /// Person whose filmography populates the catalog
    pub subject_id: Option<String>,
    /// Upper bound applied by the gateways to search limits
    pub max_search_limit: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSection {
    /// Base URL of the filmography HTTP provider
    pub url: Option<String>,
    /// Local JSON file used instead of the HTTP provider
    pub file: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,
}

/// Command-line configuration overrides
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database_url: Option<String>,
    pub database_name: Option<String>,
    pub metascore_threshold: Option<i64>,
    pub subject_id: Option<String>,
    pub max_search_limit: Option<i64>,
    pub source_url: Option<String>,
    pub source_file: Option<PathBuf>,
    pub source_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

/// Where the filmography comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Http { base_url: String },
    File { path: PathBuf },
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub database_name: String,
    pub database_url: String,
    pub metascore_threshold: i64,
    pub subject_id: String,
    pub max_search_limit: i64,
    /// `None` when no provider is configured; populate then reports the
    /// source as unavailable
    pub source: Option<SourceLocation>,
    pub source_timeout: Duration,
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            database_url: default_database_url(DEFAULT_DATABASE_NAME),
            metascore_threshold: DEFAULT_METASCORE_THRESHOLD,
            subject_id: DEFAULT_SUBJECT_ID.to_string(),
            max_search_limit: DEFAULT_MAX_SEARCH_LIMIT,
            source: None,
            source_timeout: Duration::from_secs(DEFAULT_SOURCE_TIMEOUT_SECS),
            log_level: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load the TOML file (if any) and apply overrides on top of it
    pub fn load(overrides: ConfigOverrides) -> Result<Self> {
        let toml_path = match &overrides.config_path {
            Some(path) => Some(path.clone()),
            None => default_config_path(),
        };

        let toml_config = match toml_path {
            Some(path) => {
                let config = load_toml_config(&path)?;
                info!("Loaded TOML configuration from {}", path.display());
                config
            }
            None => {
                debug!("No config file found, using defaults and overrides only");
                TomlConfig::default()
            }
        };

        Self::merge(toml_config, overrides)
    }

    /// Layer overrides over a parsed TOML config over built-in defaults
    pub fn merge(toml_config: TomlConfig, overrides: ConfigOverrides) -> Result<Self> {
        let database_name = overrides
            .database_name
            .or(toml_config.database.name)
            .unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string());
        if database_name.trim().is_empty() {
            return Err(Error::Config("database name must not be empty".to_string()));
        }

        let database_url = overrides
            .database_url
            .or(toml_config.database.url)
            .unwrap_or_else(|| default_database_url(&database_name));

        let subject_id = overrides
            .subject_id
            .or(toml_config.catalog.subject_id)
            .unwrap_or_else(|| DEFAULT_SUBJECT_ID.to_string());
        if subject_id.trim().is_empty() {
            return Err(Error::Config("subject id must not be empty".to_string()));
        }

        let max_search_limit = overrides
            .max_search_limit
            .or(toml_config.catalog.max_search_limit)
            .unwrap_or(DEFAULT_MAX_SEARCH_LIMIT);
        if max_search_limit < 1 {
            return Err(Error::Config(format!(
                "max_search_limit must be at least 1, got {}",
                max_search_limit
            )));
        }

        // A file given on the command line beats a URL from TOML and vice versa
        let source_file = overrides.source_file.or(if overrides.source_url.is_some() {
            None
        } else {
            toml_config.source.file
        });
        let source_url = overrides.source_url.or(if source_file.is_some() {
            None
        } else {
            toml_config.source.url
        });
        let source = match (source_file, source_url) {
            (Some(path), _) => Some(SourceLocation::File { path }),
            (None, Some(base_url)) => Some(SourceLocation::Http {
                base_url: base_url.trim_end_matches('/').to_string(),
            }),
            (None, None) => None,
        };

        let timeout_secs = overrides
            .source_timeout_secs
            .or(toml_config.source.timeout_secs)
            .unwrap_or(DEFAULT_SOURCE_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(Error::Config(
                "source timeout must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            host: overrides
                .host
                .or(toml_config.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: overrides.port.or(toml_config.port).unwrap_or(DEFAULT_PORT),
            database_name,
            database_url,
            metascore_threshold: overrides
                .metascore_threshold
                .or(toml_config.catalog.metascore_threshold)
                .unwrap_or(DEFAULT_METASCORE_THRESHOLD),
            subject_id,
            max_search_limit,
            source,
            source_timeout: Duration::from_secs(timeout_secs),
            log_level: overrides
                .log_level
                .or(toml_config.logging.level)
                .unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Socket address string for the HTTP listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// SQLite file named after the database, created on first connect
pub fn default_database_url(database_name: &str) -> String {
    format!("sqlite://{}.db?mode=rwc", database_name)
}

/// Locate the config file: `REELBASE_CONFIG`, then the user config dir
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs::config_dir()
        .map(|dir| dir.join("reelbase").join("config.toml"))
        .filter(|path| path.exists())
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse TOML {}: {}", path.display(), e)))
}
