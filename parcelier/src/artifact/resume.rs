//! Consistency check between a tile summary and its parcels artifact.

use std::path::{Path, PathBuf};

use geojson::{Feature, FeatureCollection, GeoJson, JsonValue};
use thiserror::Error;

/// Property of a tile summary holding the saved parcel count.
pub const NUM_PARCELS_PROPERTY: &str = "num_parcels";

/// Reasons a saved artifact pair does not allow skipping a tile.
#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("unable to read tile summary {}: {source}", path.display())]
    UnreadableTile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid tile summary {}: {reason}", path.display())]
    InvalidTile { path: PathBuf, reason: String },

    #[error("unable to read parcels {}: {source}", path.display())]
    UnreadableParcels {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid parcels {}: {reason}", path.display())]
    InvalidParcels { path: PathBuf, reason: String },

    #[error("tile summary {} has no usable {NUM_PARCELS_PROPERTY} property", path.display())]
    MissingCount { path: PathBuf },

    #[error("tile summary records {recorded} parcels but {found} were saved")]
    CountMismatch { recorded: u64, found: usize },
}

/// Checks that the tile summary at `tile_path` records exactly as many
/// parcels as the collection at `parcels_path` holds.
///
/// Returns the matching count.
pub fn counts_match(tile_path: &Path, parcels_path: &Path) -> Result<usize, ResumeError> {
    let text = std::fs::read_to_string(tile_path).map_err(|source| ResumeError::UnreadableTile {
        path: tile_path.to_path_buf(),
        source,
    })?;
    let summary = load_feature(&text).map_err(|reason| ResumeError::InvalidTile {
        path: tile_path.to_path_buf(),
        reason,
    })?;
    let recorded = recorded_count(&summary).ok_or_else(|| ResumeError::MissingCount {
        path: tile_path.to_path_buf(),
    })?;

    let text =
        std::fs::read_to_string(parcels_path).map_err(|source| ResumeError::UnreadableParcels {
            path: parcels_path.to_path_buf(),
            source,
        })?;
    let parcels: FeatureCollection =
        serde_json::from_str(&text).map_err(|e| ResumeError::InvalidParcels {
            path: parcels_path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let found = parcels.features.len();
    if recorded != found as u64 {
        return Err(ResumeError::CountMismatch { recorded, found });
    }
    Ok(found)
}

/// A summary is a single Feature; the first feature of a collection is
/// accepted as well.
fn load_feature(text: &str) -> Result<Feature, String> {
    match text.parse::<GeoJson>().map_err(|e| e.to_string())? {
        GeoJson::Feature(feature) => Ok(feature),
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .next()
            .ok_or_else(|| "feature collection is empty".to_string()),
        GeoJson::Geometry(_) => Err("expected a Feature, found a bare Geometry".to_string()),
    }
}

fn recorded_count(feature: &Feature) -> Option<u64> {
    match feature.property(NUM_PARCELS_PROPERTY)? {
        JsonValue::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        _ => None,
    }
}
