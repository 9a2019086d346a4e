//! Sequential, depth-first walk over a tile set.

use tracing::info;

use super::outcome::{RunSummary, TileOutcome};
use super::TileFetcher;
use crate::coord::Tile;
use crate::query::QueryClient;
use crate::tileset::{TileCover, TileSet};

impl<C: QueryClient, V: TileCover> TileFetcher<C, V> {
    /// Processes every tile of `tiles` and of any refinement they cause.
    ///
    /// Tiles are visited in canonical order. The children of an overflowing
    /// tile are pushed on a work stack and finished before the next sibling,
    /// so the stack never holds more than one level per zoom step.
    pub async fn run(&mut self, tiles: TileSet) -> RunSummary {
        info!(
            tiles = tiles.len(),
            zoom = tiles.zoom(),
            limit = self.config.parcel_limit(),
            wait_ms = self.config.wait().as_millis() as u64,
            "Starting fetch"
        );

        let mut summary = RunSummary::default();
        let mut stack: Vec<std::vec::IntoIter<Tile>> = vec![tiles.into_iter()];

        while let Some(level) = stack.last_mut() {
            let Some(tile) = level.next() else {
                stack.pop();
                continue;
            };

            let outcome = self.resolve(&tile).await;
            outcome.log(&tile);
            summary.record(&outcome);

            if let TileOutcome::Refined { children, .. } = outcome {
                stack.push(children.into_iter());
            }
        }

        info!(
            tiles = summary.tiles,
            saved = summary.saved,
            parcels = summary.parcels_saved,
            skipped = summary.skipped,
            refined = summary.refined,
            failed = summary.failed,
            "Fetch complete"
        );
        summary
    }
}
