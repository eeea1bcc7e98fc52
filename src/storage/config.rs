//! Configuration handling for stamp
//!
//! Configuration is stored in `~/.stamp/config.toml`:
//!
//! ```toml
//! timezone = "+09:00"          # empty = system timezone
//! always_extension = true      # behave as if --ext was passed
//! counter_file = "~/.stamp/counters.json"
//!
//! [sequence]                   # defaults for `stamp seq`
//! prefix = "P"
//! width = 4
//! start = 1
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use super::paths;
use crate::domain::SequentialSpec;

pub const DEFAULT_COUNTER_FILE: &str = "~/.stamp/counters.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// User configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Timezone for timestamps (`local`, `UTC` or an offset like `+09:00`)
    pub timezone: String,

    /// Always append `.md` to generated names
    pub always_extension: bool,

    /// Location of the analog counter file
    pub counter_file: PathBuf,

    /// Defaults for `stamp seq`
    pub sequence: SequentialSpec,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: String::new(),
            always_extension: false,
            counter_file: PathBuf::from(DEFAULT_COUNTER_FILE),
            sequence: SequentialSpec::default(),
        }
    }
}

impl Config {
    /// Returns `~/.stamp`
    pub fn config_dir() -> Result<PathBuf> {
        Ok(paths::home_dir()?.join(".stamp"))
    }

    /// Returns the default config file path
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Loads configuration from `path`, falling back to defaults if the file
    /// does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Parses TOML configuration; unset keys keep their defaults
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(config)
    }
}
