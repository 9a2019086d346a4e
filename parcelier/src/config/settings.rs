//! Settings structs for each configuration section.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are plain data types with no parsing logic.

use std::path::PathBuf;

use crate::query::ResponseFormat;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Feature service settings
    pub service: ServiceSettings,
    /// Fetch behaviour
    pub fetch: FetchSettings,
    /// Artifact locations
    pub output: OutputSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Feature service configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSettings {
    /// Layer endpoint, e.g. `https://host/arcgis/rest/services/Parcels/FeatureServer/0`
    pub url: Option<String>,
    /// User-Agent sent with every query
    pub agent: String,
    /// Response dialect requested from the service
    pub format: ResponseFormat,
    /// Spatial reference id used for `inSR` and `outSR`
    pub spatial_reference: String,
    /// Attribute used for ordering and feature ids
    pub id_key: String,
}

/// Fetch configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchSettings {
    /// Initial tile zoom level
    pub zoom: u8,
    /// Feature count at which a tile is refined
    pub limit: usize,
    /// Minimum spacing between queries, in milliseconds
    pub wait_ms: u64,
    /// Re-fetch tiles even when saved artifacts match
    pub update: bool,
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    pub parcels_dir: PathBuf,
    /// Tile summaries are only written when this is set
    pub tiles_dir: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoggingSettings {
    /// Optional log file written alongside stdout
    pub file: Option<PathBuf>,
}
