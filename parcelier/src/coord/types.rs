//! Tile and bound type definitions

use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use geo_types::{coord, Polygon, Rect};

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Hard zoom ceiling. Tiles deeper than this are never constructed, and
/// refinement stops one level above it.
pub const ZOOM_LIMIT: u8 = 25;

/// A grid cell in the Web Mercator / Slippy Map tiling.
///
/// Fields are private so that `x < 2^zoom` and `y < 2^zoom` always hold.
/// Equality and ordering follow the canonical `"{zoom}/{x}/{y}"` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    zoom: u8,
    x: u32,
    y: u32,
}

impl Tile {
    /// Creates a tile, rejecting indices outside the grid at `zoom`.
    pub fn new(zoom: u8, x: u32, y: u32) -> Result<Self, CoordError> {
        if zoom > ZOOM_LIMIT {
            return Err(CoordError::InvalidZoom(zoom));
        }
        let size = 1u64 << zoom;
        if u64::from(x) >= size || u64::from(y) >= size {
            return Err(CoordError::OutOfRange { zoom, x, y });
        }
        Ok(Self { zoom, x, y })
    }

    /// Zoom level (0-25)
    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Column, 0 at the antimeridian west edge
    pub fn x(&self) -> u32 {
        self.x
    }

    /// Row, 0 at the north edge
    pub fn y(&self) -> u32 {
        self.y
    }

    /// Geographic bound of the tile in WGS84 degrees.
    pub fn bound(&self) -> TileBound {
        let (top, left) = super::tile_to_lat_lon(self.zoom, self.x, self.y);
        let (bottom, right) =
            super::tile_to_lat_lon(self.zoom, self.x + 1, self.y + 1);
        TileBound {
            left,
            bottom,
            right,
            top,
        }
    }

    /// Returns the `left,bottom,right,top` envelope used in feature queries.
    pub fn extent_string(&self) -> String {
        self.bound().extent_string()
    }

    /// Path of the parcel feature collection saved for this tile.
    pub fn parcels_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!(
            "parcels_{}_{}_{}.geojson",
            self.zoom, self.x, self.y
        ))
    }

    /// Path of the single-feature tile summary saved for this tile.
    pub fn summary_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("tile_{}_{}_{}.geojson", self.zoom, self.x, self.y))
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

impl Ord for Tile {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_string().cmp(&other.to_string())
    }
}

impl PartialOrd for Tile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Tile {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoordError::InvalidTileString(s.to_string());

        let parts: Vec<&str> = s.trim().split('/').collect();
        if parts.len() != 3 {
            return Err(invalid());
        }

        let zoom: u8 = parts[0].parse().map_err(|_| invalid())?;
        let x: u32 = parts[1].parse().map_err(|_| invalid())?;
        let y: u32 = parts[2].parse().map_err(|_| invalid())?;

        Tile::new(zoom, x, y)
    }
}

/// Axis-aligned geographic bound of a tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileBound {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl TileBound {
    /// Formats the bound as `left,bottom,right,top` with six decimals.
    pub fn extent_string(&self) -> String {
        format!(
            "{:.6},{:.6},{:.6},{:.6}",
            self.left, self.bottom, self.right, self.top
        )
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.left, y: self.bottom },
            coord! { x: self.right, y: self.top },
        )
    }

    /// Closed polygon ring around the bound.
    pub fn to_polygon(&self) -> Polygon<f64> {
        self.to_rect().to_polygon()
    }
}

/// Errors that can occur when constructing or parsing tiles.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Zoom level above the hard ceiling
    InvalidZoom(u8),
    /// Column or row outside the grid at this zoom
    OutOfRange { zoom: u8, x: u32, y: u32 },
    /// Tile string is not `{zoom}/{x}/{y}`
    InvalidTileString(String),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidZoom(zoom) => {
                write!(
                    f,
                    "Invalid zoom level: {} (must be between 0 and {})",
                    zoom, ZOOM_LIMIT
                )
            }
            CoordError::OutOfRange { zoom, x, y } => {
                write!(
                    f,
                    "Tile {}/{}/{} is outside the grid (x and y must be below {})",
                    zoom,
                    x,
                    y,
                    1u64 << zoom
                )
            }
            CoordError::InvalidTileString(s) => {
                write!(f, "Invalid tile string: '{}' (expected z/x/y)", s)
            }
        }
    }
}

impl std::error::Error for CoordError {}
