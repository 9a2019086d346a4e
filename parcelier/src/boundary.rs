//! Boundary input.
//!
//! A boundary is read from a GeoJSON document holding a Geometry, a Feature
//! or a FeatureCollection; for a collection the first feature is used.

use std::path::{Path, PathBuf};

use geo_types::Geometry;
use geojson::GeoJson;
use thiserror::Error;

/// Errors raised while loading a boundary.
#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error("Failed to read boundary {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid GeoJSON: {0}")]
    Parse(#[from] geojson::Error),

    #[error("Boundary contains no geometry")]
    Empty,
}

/// Reads and parses the boundary at `path`.
pub fn load_boundary(path: &Path) -> Result<Geometry<f64>, BoundaryError> {
    let text = std::fs::read_to_string(path).map_err(|source| BoundaryError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_boundary(&text)
}

/// Parses a boundary document.
pub fn parse_boundary(text: &str) -> Result<Geometry<f64>, BoundaryError> {
    let geometry = match text.parse::<GeoJson>()? {
        GeoJson::Geometry(geometry) => geometry,
        GeoJson::Feature(feature) => feature.geometry.ok_or(BoundaryError::Empty)?,
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .next()
            .and_then(|feature| feature.geometry)
            .ok_or(BoundaryError::Empty)?,
    };

    Ok(Geometry::try_from(geometry)?)
}
