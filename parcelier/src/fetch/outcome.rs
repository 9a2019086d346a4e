//! Per-tile outcomes and run statistics.

use std::fmt;
use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::coord::Tile;
use crate::error::FetchError;
use crate::tileset::TileSet;

/// Classification of a query result by feature count `n` against the
/// per-tile limit `L`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// `n == 0`
    NoParcels,
    /// `0 < n < L`
    Ok,
    /// `n >= L`: the service may have truncated the result
    Overflow,
}

impl Classification {
    pub fn of(count: usize, limit: usize) -> Self {
        if count == 0 {
            Classification::NoParcels
        } else if count < limit {
            Classification::Ok
        } else {
            Classification::Overflow
        }
    }
}

/// What happened to one tile.
#[derive(Debug)]
pub enum TileOutcome {
    /// Saved artifacts matched; no query was made
    Skipped,
    /// The service returned no features
    NoParcels,
    /// Features were saved
    Saved { parcels: usize, path: PathBuf },
    /// Overflowing tile replaced by its children one zoom level deeper
    Refined { parcels: usize, children: TileSet },
    /// Overflowing tile at the zoom ceiling; its features are lost
    ZoomLimitExceeded { parcels: usize },
    /// The tile could not be processed
    Failed(FetchError),
}

impl TileOutcome {
    /// Short label used in log lines.
    pub fn status(&self) -> &'static str {
        match self {
            TileOutcome::Skipped => "skipped",
            TileOutcome::NoParcels => "no parcels",
            TileOutcome::Saved { .. } => "saved",
            TileOutcome::Refined { .. } => "refined",
            TileOutcome::ZoomLimitExceeded { .. } => "zoom limit exceeded",
            TileOutcome::Failed(_) => "failed",
        }
    }

    /// Logs the outcome with the tile identity.
    pub fn log(&self, tile: &Tile) {
        let status = self.status();
        match self {
            TileOutcome::Skipped => {
                info!(tile = %tile, status, "Saved artifacts match, skipping tile");
            }
            TileOutcome::NoParcels => {
                info!(tile = %tile, status, "No parcels in tile");
            }
            TileOutcome::Saved { parcels, path } => {
                info!(tile = %tile, status, parcels, path = %path.display(), "Saved parcels");
            }
            TileOutcome::Refined { parcels, children } => {
                info!(
                    tile = %tile,
                    status,
                    parcels,
                    children = children.len(),
                    zoom = children.zoom(),
                    "Parcel limit reached, refining tile"
                );
            }
            TileOutcome::ZoomLimitExceeded { parcels } => {
                warn!(tile = %tile, status, parcels, "Parcel limit reached at the zoom limit, dropping tile");
            }
            TileOutcome::Failed(e) => {
                error!(tile = %tile, status, kind = e.kind(), error = %e, "Tile failed");
            }
        }
    }
}

/// Totals for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Tiles visited, refined children included
    pub tiles: usize,
    pub skipped: usize,
    pub empty: usize,
    pub saved: usize,
    pub parcels_saved: usize,
    pub refined: usize,
    pub zoom_limited: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &TileOutcome) {
        self.tiles += 1;
        match outcome {
            TileOutcome::Skipped => self.skipped += 1,
            TileOutcome::NoParcels => self.empty += 1,
            TileOutcome::Saved { parcels, .. } => {
                self.saved += 1;
                self.parcels_saved += parcels;
            }
            TileOutcome::Refined { .. } => self.refined += 1,
            TileOutcome::ZoomLimitExceeded { .. } => self.zoom_limited += 1,
            TileOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// Whether any tile was lost to an error or the zoom ceiling.
    pub fn has_losses(&self) -> bool {
        self.failed > 0 || self.zoom_limited > 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tiles: {} saved ({} parcels), {} skipped, {} empty, {} refined, {} at zoom limit, {} failed",
            self.tiles,
            self.saved,
            self.parcels_saved,
            self.skipped,
            self.empty,
            self.refined,
            self.zoom_limited,
            self.failed
        )
    }
}
