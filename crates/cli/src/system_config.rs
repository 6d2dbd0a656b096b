//! System-wide configuration
//!
//! Lives at `<config dir>/burrow/config.toml`. The directory can be moved
//! with `BURROW_CONFIG_DIR`, which tests use to stay out of the real home
//! directory. A missing file means defaults.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "BURROW_CONFIG_DIR";

const CONFIG_FILE_NAME: &str = "config.toml";

/// Every key accepted by `get` / `set`
pub const KEYS: &[&str] = &[
    "listing.show_hidden",
    "listing.date_format",
    "watch.max_directories",
    "watch.include_tree",
    "session.remember_last_directory",
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine configuration directory")]
    NoConfigDir,

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: String, message: String },
}

impl ConfigError {
    fn invalid(key: &str, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// How timestamps are shown in listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    /// "3 hours ago"
    #[default]
    Relative,
    /// "2024-01-03 14:30:00" (UTC)
    Absolute,
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateFormat::Relative => write!(f, "relative"),
            DateFormat::Absolute => write!(f, "absolute"),
        }
    }
}

impl FromStr for DateFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relative" => Ok(DateFormat::Relative),
            "absolute" => Ok(DateFormat::Absolute),
            other => Err(format!("expected 'relative' or 'absolute', got '{}'", other)),
        }
    }
}

/// Listing behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Show dot-files without `--all`
    pub show_hidden: bool,
    pub date_format: DateFormat,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            show_hidden: false,
            date_format: DateFormat::Relative,
        }
    }
}

/// `bw watch` behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Upper bound on directories watched at once (1-1024)
    pub max_directories: usize,
    /// Keep a navigator tree alongside the flat lists
    pub include_tree: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            max_directories: 64,
            include_tree: false,
        }
    }
}

/// Session persistence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// `bw ls` without a directory reopens the last listed one
    pub remember_last_directory: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            remember_last_directory: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub listing: ListingConfig,
    pub watch: WatchConfig,
    pub session: SessionConfig,
}

impl SystemConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=1024).contains(&self.watch.max_directories) {
            return Err(ConfigError::invalid(
                "watch.max_directories",
                format!("must be between 1 and 1024, got {}", self.watch.max_directories),
            ));
        }
        Ok(())
    }

    /// Current value of `key` as text
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "listing.show_hidden" => self.listing.show_hidden.to_string(),
            "listing.date_format" => self.listing.date_format.to_string(),
            "watch.max_directories" => self.watch.max_directories.to_string(),
            "watch.include_tree" => self.watch.include_tree.to_string(),
            "session.remember_last_directory" => self.session.remember_last_directory.to_string(),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        };
        Ok(value)
    }

    /// Parse `value` into `key`; nothing changes unless the result validates
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut next = self.clone();
        match key {
            "listing.show_hidden" => next.listing.show_hidden = parse_bool(key, value)?,
            "listing.date_format" => {
                next.listing.date_format = value
                    .parse()
                    .map_err(|e: String| ConfigError::invalid(key, e))?;
            }
            "watch.max_directories" => {
                next.watch.max_directories = value
                    .parse()
                    .map_err(|_| ConfigError::invalid(key, "must be a positive integer"))?;
            }
            "watch.include_tree" => next.watch.include_tree = parse_bool(key, value)?,
            "session.remember_last_directory" => {
                next.session.remember_last_directory = parse_bool(key, value)?;
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        next.validate()?;
        *self = next;
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::invalid(key, "must be 'true' or 'false'"))
}

/// Directory holding Burrow's configuration and session files
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir()
        .map(|dir| dir.join("burrow"))
        .ok_or(ConfigError::NoConfigDir)
}

pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the system configuration, falling back to defaults
pub fn load() -> Result<SystemConfig, ConfigError> {
    load_from(&config_file_path()?)
}

pub fn load_from(path: &Path) -> Result<SystemConfig, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(SystemConfig::default()),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config: SystemConfig = toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

/// Save the system configuration
pub fn save(config: &SystemConfig) -> Result<(), ConfigError> {
    save_to(config, &config_file_path()?)
}

pub fn save_to(config: &SystemConfig, path: &Path) -> Result<(), ConfigError> {
    config.validate()?;
    let text = toml::to_string_pretty(config)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, text).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the default configuration if no file exists yet
pub fn init_if_missing() -> Result<PathBuf, ConfigError> {
    let path = config_file_path()?;
    if !path.exists() {
        save_to(&SystemConfig::default(), &path)?;
    }
    Ok(path)
}

/// Annotated example configuration
pub fn example_config() -> &'static str {
    r#"# Burrow configuration
# Location: <config dir>/burrow/config.toml (override with BURROW_CONFIG_DIR)

[listing]
# Show dot-files without --all
show_hidden = false
# "relative" (3 hours ago) or "absolute" (2024-01-03 14:30:00 UTC)
date_format = "relative"

[watch]
# Maximum directories watched at once (1-1024)
max_directories = 64
# Keep a navigator tree alongside the flat lists in `bw watch`
include_tree = false

[session]
# `bw ls` with no directory reopens the last listed one
remember_last_directory = true
"#
}
