//! Per-tile resolution: skip, fetch, save or refine.

use tracing::debug;

use super::outcome::{Classification, TileOutcome};
use super::TileFetcher;
use crate::coord::{Tile, ZOOM_LIMIT};
use crate::error::FetchError;
use crate::features;
use crate::query::{QueryClient, QueryParams};
use crate::tileset::TileCover;

impl<C: QueryClient, V: TileCover> TileFetcher<C, V> {
    /// Resolves one tile.
    ///
    /// Never fails: errors are returned as [`TileOutcome::Failed`] so the
    /// caller can log them and carry on with the next tile.
    pub async fn resolve(&mut self, tile: &Tile) -> TileOutcome {
        if !self.config.update() && self.store.resume_matches(tile) {
            return TileOutcome::Skipped;
        }

        match self.fetch(tile).await {
            Ok(outcome) => outcome,
            Err(e) => TileOutcome::Failed(e),
        }
    }

    async fn fetch(&mut self, tile: &Tile) -> Result<TileOutcome, FetchError> {
        let params = QueryParams::for_tile(tile, &self.config);

        self.pacer.ready().await;
        debug!(tile = %tile, extent = %tile.extent_string(), "Querying tile");
        let body = self.client.query(&params).await?;

        let parcels = features::decode(&body, self.config.format(), self.config.id_key())?;
        let count = parcels.len();

        match Classification::of(count, self.config.parcel_limit()) {
            Classification::NoParcels => Ok(TileOutcome::NoParcels),
            Classification::Ok => {
                let path = self.store.save_parcels(tile, &parcels)?;
                self.store.save_summary(tile, count)?;
                Ok(TileOutcome::Saved {
                    parcels: count,
                    path,
                })
            }
            Classification::Overflow if tile.zoom() + 1 < ZOOM_LIMIT => {
                let children = self.builder.refine(tile)?;
                Ok(TileOutcome::Refined {
                    parcels: count,
                    children,
                })
            }
            Classification::Overflow => Ok(TileOutcome::ZoomLimitExceeded { parcels: count }),
        }
    }
}
