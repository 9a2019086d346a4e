//! parcelier - Adaptive parcel downloads from ArcGIS feature services
//!
//! This library covers a boundary with Web Mercator tiles, queries a
//! feature service once per tile and saves the parcels of each tile as
//! GeoJSON. Tiles whose result reaches the service's record limit are split
//! into their four children and fetched again, down to the zoom ceiling.
//!
//! # High-Level API
//!
//! ```ignore
//! use parcelier::boundary::load_boundary;
//! use parcelier::config::FetchConfig;
//! use parcelier::fetch::TileFetcher;
//! use parcelier::query::ReqwestQueryClient;
//! use parcelier::tileset::TileSetBuilder;
//!
//! let config = FetchConfig::new(url).with_tiles_dir("tiles");
//! let tiles = TileSetBuilder::new().build(&load_boundary(path)?, 13)?;
//!
//! let mut fetcher = TileFetcher::new(ReqwestQueryClient::from_config(&config)?, config);
//! fetcher.store().prepare()?;
//! let summary = fetcher.run(tiles).await;
//! ```

pub mod artifact;
pub mod boundary;
pub mod config;
pub mod coord;
pub mod error;
pub mod features;
pub mod fetch;
pub mod logging;
pub mod query;
pub mod tileset;

pub use error::FetchError;

/// Version of the parcelier library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
