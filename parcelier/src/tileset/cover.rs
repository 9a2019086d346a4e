//! Tile covering of boundary geometries.

use std::collections::BTreeSet;

use geo::{BoundingRect, Intersects};
use geo_types::Geometry;

use crate::coord::{grid_size, lat_to_tile_y, lon_to_tile_x, Tile};

/// Fractional indices closer than this (in tiles) to a whole number are
/// treated as lying exactly on a tile edge.
const EDGE_EPSILON: f64 = 1e-6;

/// Capability that selects the tiles at a zoom level touching a geometry.
///
/// Implementations must return only tiles whose bound intersects the
/// geometry. The returned set carries no duplicates by construction.
pub trait TileCover: Send + Sync {
    fn cover(&self, geometry: &Geometry<f64>, zoom: u8) -> BTreeSet<Tile>;
}

/// Default cover over the Web Mercator grid.
///
/// Walks the index range spanned by the geometry's bounding rectangle and
/// keeps each candidate whose bound intersects the geometry. The range is
/// half-open: an edge lying exactly on a tile boundary does not pull in the
/// neighbouring row or column, so re-covering a tile's own bound one level
/// deeper yields exactly its four children.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebMercatorCover;

impl TileCover for WebMercatorCover {
    fn cover(&self, geometry: &Geometry<f64>, zoom: u8) -> BTreeSet<Tile> {
        let mut tiles = BTreeSet::new();

        let Some(rect) = geometry.bounding_rect() else {
            return tiles;
        };

        let last = grid_size(zoom) - 1;
        let (x_min, x_max) = index_range(
            lon_to_tile_x(rect.min().x, zoom),
            lon_to_tile_x(rect.max().x, zoom),
            last,
        );
        // Rows grow southwards, so the north edge gives the first row
        let (y_min, y_max) = index_range(
            lat_to_tile_y(rect.max().y, zoom),
            lat_to_tile_y(rect.min().y, zoom),
            last,
        );

        for x in x_min..=x_max {
            for y in y_min..=y_max {
                let Ok(tile) = Tile::new(zoom, x, y) else {
                    continue;
                };
                if geometry.intersects(&tile.bound().to_polygon()) {
                    tiles.insert(tile);
                }
            }
        }

        tiles
    }
}

fn snap(v: f64) -> f64 {
    let rounded = v.round();
    if (v - rounded).abs() < EDGE_EPSILON {
        rounded
    } else {
        v
    }
}

/// Whole-tile index range covering the fractional span `[start, end)`.
fn index_range(start: f64, end: f64, last: u32) -> (u32, u32) {
    let first = snap(start).floor().max(0.0);
    let past = snap(end).ceil();
    let first = (first as u32).min(last);
    let final_index = ((past - 1.0).max(f64::from(first)) as u32).min(last);
    (first, final_index)
}
