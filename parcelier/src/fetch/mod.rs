//! The adaptive fetch engine.
//!
//! [`TileFetcher`] walks a [`TileSet`](crate::tileset::TileSet) one tile at
//! a time. For each tile it either skips (saved artifacts match), or
//! queries the service and then saves the parcels, records that the tile
//! is empty, or refines the tile one zoom level deeper when the result hits
//! the parcel limit. Refinement is depth-first: the children of a tile are
//! finished before its next sibling.
//!
//! # Example
//!
//! ```ignore
//! use parcelier::fetch::TileFetcher;
//! use parcelier::query::ReqwestQueryClient;
//! use parcelier::tileset::TileSetBuilder;
//!
//! let client = ReqwestQueryClient::from_config(&config)?;
//! let tiles = TileSetBuilder::new().build(&boundary, 13)?;
//!
//! let mut fetcher = TileFetcher::new(client, config);
//! let summary = fetcher.run(tiles).await;
//! println!("{}", summary);
//! ```

mod driver;
mod outcome;
mod pacer;
mod resolver;

pub use outcome::{Classification, RunSummary, TileOutcome};
pub use pacer::Pacer;

use crate::artifact::ArtifactStore;
use crate::config::FetchConfig;
use crate::query::QueryClient;
use crate::tileset::{TileCover, TileSetBuilder, WebMercatorCover};

/// Fetches parcels tile by tile.
pub struct TileFetcher<C, V = WebMercatorCover> {
    client: C,
    builder: TileSetBuilder<V>,
    store: ArtifactStore,
    config: FetchConfig,
    pacer: Pacer,
}

impl<C: QueryClient> TileFetcher<C, WebMercatorCover> {
    /// Creates a fetcher that refines with the Web Mercator cover.
    pub fn new(client: C, config: FetchConfig) -> Self {
        Self::with_cover(client, config, WebMercatorCover)
    }
}

impl<C: QueryClient, V: TileCover> TileFetcher<C, V> {
    /// Creates a fetcher that refines with a custom cover.
    pub fn with_cover(client: C, config: FetchConfig, cover: V) -> Self {
        Self {
            client,
            builder: TileSetBuilder::with_cover(cover),
            store: ArtifactStore::from_config(&config),
            pacer: Pacer::new(config.wait()),
            config,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }
}
