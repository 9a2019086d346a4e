//! Per-tile fetch error taxonomy.

use std::path::PathBuf;
use thiserror::Error;

use crate::tileset::TileSetError;

/// Errors that stop the processing of a single tile.
///
/// None of these abort a run: the driver logs them with the tile identity
/// and moves on to the next tile.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// Transport failure, non-2xx status, or a service error envelope
    #[error("api error: {0}")]
    Api(String),

    /// Esri JSON could not be transcoded to GeoJSON
    #[error("json conversion error: {0}")]
    Conversion(String),

    /// Payload is not a valid GeoJSON feature collection
    #[error("geojson error: {0}")]
    Decode(String),

    /// Artifact could not be written
    #[error("unable to save {}: {reason}", path.display())]
    Save { path: PathBuf, reason: String },

    /// Refinement tile set could not be built
    #[error("tiling error: {0}")]
    Tiling(#[from] TileSetError),
}

impl FetchError {
    /// Short classification label used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Api(_) => "api error",
            FetchError::Conversion(_) => "json conversion error",
            FetchError::Decode(_) => "geojson error",
            FetchError::Save { .. } => "save error",
            FetchError::Tiling(_) => "tiling error",
        }
    }
}
