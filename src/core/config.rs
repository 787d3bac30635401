// src/core/config.rs

use crate::{
    constants::{CONFIG_DIR_NAME, CONFIG_FILENAME},
    models::EngineConfig,
};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why the configuration could not be loaded.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The platform has no per-user config directory.
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    /// The file exists (or was named explicitly) but could not be read.
    #[error("Could not read config file '{path}': {source}")]
    Read {
        /// The config file.
        path: String,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML or has fields of the wrong type.
    #[error("Could not parse config file '{path}': {source}")]
    Parse {
        /// The config file.
        path: String,
        /// The TOML error, with line and column.
        #[source]
        source: toml::de::Error,
    },
}

/// Returns the default location of the config file (`~/.config/typeline/config.toml`).
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILENAME))
}

/// Loads the engine configuration.
///
/// An explicit `path` must exist. Without one, the default location is tried and
/// a missing file there simply means "use the defaults".
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, ConfigError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Ok(path) if path.exists() => path,
            Ok(path) => {
                log::debug!("No config file at '{}', using defaults.", path.display());
                return Ok(EngineConfig::default());
            }
            Err(e) => {
                log::debug!("{} Using defaults.", e);
                return Ok(EngineConfig::default());
            }
        },
    };

    log::debug!("Loading config from '{}'", path.display());
    let content = fs::read_to_string(&path).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_config(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        source: e,
    })
}

/// Parses the TOML text of a config file. Missing keys take their default values.
pub fn parse_config(content: &str) -> Result<EngineConfig, toml::de::Error> {
    let config: EngineConfig = toml::from_str(content)?;
    log::debug!("Parsed config: {:?}", config);
    Ok(config)
}
