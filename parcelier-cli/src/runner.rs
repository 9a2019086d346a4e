//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization and file output so
//! command handlers stay focused on their own work.

use std::path::Path;

use parcelier::config::{ConfigFile, Verbosity};
use parcelier::logging::{init_logging, LoggingGuard};
use parcelier::tileset::TileSet;
use tracing::info;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Explicit config file; the default location is used otherwise
    /// * `verbosity` - Selects the default log level
    pub fn new(config_path: Option<&Path>, verbosity: Verbosity) -> Result<Self, CliError> {
        let config = load_config(config_path)?;

        let logging_guard =
            init_logging(config.logging.file.as_deref(), verbosity.default_log_level())
                .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("parcelier v{}", parcelier::VERSION);
        info!("parcelier CLI: {} command", command);
    }

    /// Write a tile set as a GeoJSON feature collection.
    pub fn write_tileset(&self, path: &Path, tiles: &TileSet) -> Result<(), CliError> {
        let to_error = |error: std::io::Error| CliError::FileWrite {
            path: path.display().to_string(),
            error,
        };

        let body = tiles
            .to_pretty_geojson()
            .map_err(|e| to_error(std::io::Error::other(e)))?;
        std::fs::write(path, body).map_err(to_error)?;

        info!(path = %path.display(), tiles = tiles.len(), "Wrote tile set");
        Ok(())
    }
}

/// Load the config file at `path`, or the default one.
///
/// A missing default file means defaults; a missing explicit file is an error.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    match path {
        Some(path) if !path.exists() => Err(CliError::Config(format!(
            "config file not found: {}",
            path.display()
        ))),
        Some(path) => Ok(ConfigFile::load_from(path)?),
        None => Ok(ConfigFile::load()?),
    }
}
