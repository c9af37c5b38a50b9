//! Configuration file support for Posology.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/posology/config.toml`.

use crate::{AgeUnit, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub query: QueryConfig,
}

/// Record storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_records_dir")]
    pub records_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            records_dir: default_records_dir(),
        }
    }
}

/// Query defaults configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(default = "default_age_unit")]
    pub default_age_unit: AgeUnit,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_age_unit: default_age_unit(),
        }
    }
}

// Default value functions
fn default_records_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("posology").join("records")
}

fn default_age_unit() -> AgeUnit {
    AgeUnit::Years
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("posology").join("config.toml")
    }
}
