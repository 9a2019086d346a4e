//! On-disk artifacts for fetched tiles.
//!
//! Two files are written per saved tile:
//!
//! - `parcels_{z}_{x}_{y}.geojson` in the parcels directory: the
//!   pretty-printed feature collection returned by the service
//! - `tile_{z}_{x}_{y}.geojson` in the optional tiles directory: a single
//!   Feature with the tile polygon and its parcel count
//!
//! A later run only skips a tile when both files exist and agree on the
//! count; see [`counts_match`].

mod resume;

pub use resume::{counts_match, ResumeError, NUM_PARCELS_PROPERTY};

use std::path::{Path, PathBuf};

use geojson::{Feature, Geometry, Value};
use tracing::{debug, info};

use crate::config::FetchConfig;
use crate::coord::Tile;
use crate::error::FetchError;
use crate::features::ParcelCollection;

/// Property of a tile summary holding the canonical tile string.
pub const EXTENT_PROPERTY: &str = "extent";

/// Reads and writes the artifacts of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactStore {
    parcels_dir: PathBuf,
    tiles_dir: Option<PathBuf>,
}

impl ArtifactStore {
    pub fn new(parcels_dir: impl Into<PathBuf>, tiles_dir: Option<PathBuf>) -> Self {
        Self {
            parcels_dir: parcels_dir.into(),
            tiles_dir,
        }
    }

    pub fn from_config(config: &FetchConfig) -> Self {
        Self::new(
            config.parcels_dir(),
            config.tiles_dir().map(Path::to_path_buf),
        )
    }

    /// Creates the output directories.
    pub fn prepare(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.parcels_dir)?;
        if let Some(dir) = &self.tiles_dir {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    pub fn parcels_dir(&self) -> &Path {
        &self.parcels_dir
    }

    pub fn tiles_dir(&self) -> Option<&Path> {
        self.tiles_dir.as_deref()
    }

    pub fn parcels_path(&self, tile: &Tile) -> PathBuf {
        tile.parcels_path(&self.parcels_dir)
    }

    /// Summary path, if summaries are enabled.
    pub fn summary_path(&self, tile: &Tile) -> Option<PathBuf> {
        self.tiles_dir.as_deref().map(|dir| tile.summary_path(dir))
    }

    pub fn has_parcels(&self, tile: &Tile) -> bool {
        self.parcels_path(tile).is_file()
    }

    pub fn has_summary(&self, tile: &Tile) -> bool {
        self.summary_path(tile).is_some_and(|p| p.is_file())
    }

    /// Writes the pretty-printed parcels artifact and returns its path.
    pub fn save_parcels(
        &self,
        tile: &Tile,
        parcels: &ParcelCollection,
    ) -> Result<PathBuf, FetchError> {
        let path = self.parcels_path(tile);
        let body = parcels.to_pretty_json().map_err(|e| FetchError::Save {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        write(&path, body)?;
        debug!(tile = %tile, path = %path.display(), parcels = parcels.len(), "Saved parcels");
        Ok(path)
    }

    /// Writes the tile summary, if summaries are enabled.
    pub fn save_summary(&self, tile: &Tile, num_parcels: usize) -> Result<Option<PathBuf>, FetchError> {
        let Some(path) = self.summary_path(tile) else {
            return Ok(None);
        };

        let polygon = tile.bound().to_polygon();
        let mut feature = Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::from(&polygon))),
            id: None,
            properties: None,
            foreign_members: None,
        };
        feature.set_property(EXTENT_PROPERTY, tile.to_string());
        feature.set_property(NUM_PARCELS_PROPERTY, num_parcels);

        let body = serde_json::to_string_pretty(&feature).map_err(|e| FetchError::Save {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        write(&path, body)?;
        debug!(tile = %tile, path = %path.display(), "Saved tile summary");
        Ok(Some(path))
    }

    /// Whether the saved artifacts for `tile` are complete and consistent.
    ///
    /// Never fails: any problem is logged and reported as `false`.
    pub fn resume_matches(&self, tile: &Tile) -> bool {
        let Some(summary) = self.summary_path(tile) else {
            return false;
        };
        let parcels = self.parcels_path(tile);
        if !parcels.is_file() || !summary.is_file() {
            return false;
        }

        match counts_match(&summary, &parcels) {
            Ok(_) => true,
            Err(e) => {
                info!(tile = %tile, reason = %e, "Saved artifacts do not match, fetching again");
                false
            }
        }
    }
}

fn write(path: &Path, body: String) -> Result<(), FetchError> {
    std::fs::write(path, body).map_err(|e| FetchError::Save {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
