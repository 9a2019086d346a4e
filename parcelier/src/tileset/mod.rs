//! Tile sets covering a boundary geometry at one zoom level.
//!
//! [`TileSetBuilder`] wraps a [`TileCover`] and produces an immutable
//! [`TileSet`] whose enumeration order is the lexicographic order of the
//! canonical tile strings. The order is stable across runs, which keeps
//! resume behaviour and logs reproducible.
//!
//! # Example
//!
//! ```
//! use parcelier::coord::Tile;
//! use parcelier::tileset::TileSetBuilder;
//! use geo_types::Geometry;
//!
//! let parent = Tile::new(10, 301, 385).unwrap();
//! let geometry = Geometry::Polygon(parent.bound().to_polygon());
//!
//! let tiles = TileSetBuilder::new().build(&geometry, 11).unwrap();
//! assert_eq!(tiles.len(), 4);
//! ```

mod cover;

pub use cover::{TileCover, WebMercatorCover};

use geo_types::Geometry;
use geojson::{Feature, FeatureCollection, Geometry as GeoJsonGeometry, Value};
use thiserror::Error;

use crate::coord::{Tile, ZOOM_LIMIT};

/// Errors raised while building a tile set.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TileSetError {
    /// Boundary is not an areal geometry
    #[error("Unsupported boundary geometry: {0} (expected Polygon or MultiPolygon)")]
    UnsupportedGeometry(&'static str),

    /// Zoom level above the hard ceiling
    #[error("Invalid zoom level: {0} (must be between 0 and {max})", max = ZOOM_LIMIT)]
    InvalidZoom(u8),
}

/// Unique tiles covering a geometry at one zoom level, in canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSet {
    zoom: u8,
    tiles: Vec<Tile>,
}

impl TileSet {
    /// Zoom level shared by every tile in the set.
    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tiles in enumeration order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tile> {
        self.tiles.iter()
    }

    /// Returns the tile at `idx` in enumeration order.
    pub fn get(&self, idx: usize) -> Option<Tile> {
        self.tiles.get(idx).copied()
    }

    pub fn contains(&self, tile: &Tile) -> bool {
        self.tiles.binary_search(tile).is_ok()
    }

    /// Renders the set as a feature collection of tile polygons.
    ///
    /// Each feature carries `tile` (canonical string) and `extent`
    /// (`left,bottom,right,top`) properties.
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let features = self
            .tiles
            .iter()
            .map(|tile| {
                let polygon = tile.bound().to_polygon();
                let mut feature = Feature {
                    bbox: None,
                    geometry: Some(GeoJsonGeometry::new(Value::from(&polygon))),
                    id: None,
                    properties: None,
                    foreign_members: None,
                };
                feature.set_property("tile", tile.to_string());
                feature.set_property("extent", tile.extent_string());
                feature
            })
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }

    /// Pretty-printed [`to_feature_collection`](Self::to_feature_collection).
    pub fn to_pretty_geojson(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_feature_collection())
    }
}

impl IntoIterator for TileSet {
    type Item = Tile;
    type IntoIter = std::vec::IntoIter<Tile>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles.into_iter()
    }
}

impl<'a> IntoIterator for &'a TileSet {
    type Item = &'a Tile;
    type IntoIter = std::slice::Iter<'a, Tile>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles.iter()
    }
}

/// Builds [`TileSet`]s from boundary geometries.
#[derive(Debug, Clone, Default)]
pub struct TileSetBuilder<C = WebMercatorCover> {
    cover: C,
}

impl TileSetBuilder<WebMercatorCover> {
    /// Creates a builder backed by the Web Mercator cover.
    pub fn new() -> Self {
        Self {
            cover: WebMercatorCover,
        }
    }
}

impl<C: TileCover> TileSetBuilder<C> {
    /// Creates a builder backed by a custom cover.
    pub fn with_cover(cover: C) -> Self {
        Self { cover }
    }

    /// Covers `geometry` with tiles at `zoom`.
    ///
    /// Accepts polygons, multipolygons and rectangles.
    pub fn build(&self, geometry: &Geometry<f64>, zoom: u8) -> Result<TileSet, TileSetError> {
        if zoom > ZOOM_LIMIT {
            return Err(TileSetError::InvalidZoom(zoom));
        }

        let geometry = match geometry {
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) => geometry.clone(),
            Geometry::Rect(rect) => Geometry::Polygon(rect.to_polygon()),
            other => return Err(TileSetError::UnsupportedGeometry(geometry_name(other))),
        };

        // BTreeSet iteration is already in canonical-string order
        let tiles = self.cover.cover(&geometry, zoom).into_iter().collect();

        Ok(TileSet { zoom, tiles })
    }

    /// Covers the bound of `tile` one zoom level deeper.
    ///
    /// The tile's own square is re-covered, not the input boundary
    /// intersected with it, so refined tiles may extend past the boundary.
    pub fn refine(&self, tile: &Tile) -> Result<TileSet, TileSetError> {
        let geometry = Geometry::Polygon(tile.bound().to_polygon());
        self.build(&geometry, tile.zoom() + 1)
    }
}

fn geometry_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        _ => "Geometry",
    }
}
