//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use parcelier::boundary::BoundaryError;
use parcelier::config::ConfigFileError;
use parcelier::tileset::TileSetError;
use parcelier::FetchError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Boundary could not be loaded
    Boundary(BoundaryError),
    /// Tile set could not be built
    Tiling(TileSetError),
    /// Failed to create the query client
    Client(FetchError),
    /// Failed to write an output file or directory
    FileWrite { path: String, error: std::io::Error },
    /// Failed to start the async runtime
    Runtime(std::io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Config(_) => {
                eprintln!();
                eprintln!(
                    "Settings are read from {} unless --config is given.",
                    parcelier::config::config_file_path().display()
                );
                eprintln!("Command-line flags override the file.");
            }
            CliError::Boundary(_) => {
                eprintln!();
                eprintln!("The boundary must be a GeoJSON Geometry, Feature or FeatureCollection");
                eprintln!("with a Polygon or MultiPolygon geometry.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Boundary(e) => write!(f, "Invalid boundary: {}", e),
            CliError::Tiling(e) => write!(f, "Failed to build tile set: {}", e),
            CliError::Client(e) => write!(f, "Failed to create query client: {}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write '{}': {}", path, error)
            }
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Boundary(e) => Some(e),
            CliError::Tiling(e) => Some(e),
            CliError::Client(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            CliError::Runtime(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<BoundaryError> for CliError {
    fn from(e: BoundaryError) -> Self {
        CliError::Boundary(e)
    }
}

impl From<TileSetError> for CliError {
    fn from(e: TileSetError) -> Self {
        CliError::Tiling(e)
    }
}
