//! Tile coordinate module
//!
//! Provides the [`Tile`] grid cell type and conversions between geographic
//! coordinates (latitude/longitude) and fractional Web Mercator tile indices.

mod types;


pub use types::{
    CoordError, Tile, TileBound, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON, ZOOM_LIMIT,
};

use std::f64::consts::PI;

/// Number of tiles along one axis at `zoom`.
#[inline]
pub fn grid_size(zoom: u8) -> u32 {
    1u32 << zoom
}

/// Converts a longitude to a fractional tile column at `zoom`.
///
/// Longitudes outside -180..180 are clamped.
#[inline]
pub fn lon_to_tile_x(lon: f64, zoom: u8) -> f64 {
    let n = f64::from(grid_size(zoom));
    let lon = lon.clamp(MIN_LON, MAX_LON);
    (lon + 180.0) / 360.0 * n
}

/// Converts a latitude to a fractional tile row at `zoom`.
///
/// Latitudes are clamped to the Web Mercator range first.
#[inline]
pub fn lat_to_tile_y(lat: f64, zoom: u8) -> f64 {
    let n = f64::from(grid_size(zoom));
    let lat_rad = lat.clamp(MIN_LAT, MAX_LAT).to_radians();
    (1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n
}

/// Converts a tile corner back to geographic coordinates.
///
/// Returns the latitude/longitude of the northwest corner of `(x, y)`.
/// `x` and `y` may equal the grid size to address the far edges.
#[inline]
pub fn tile_to_lat_lon(zoom: u8, x: u32, y: u32) -> (f64, f64) {
    let n = f64::from(grid_size(zoom));

    let lon = f64::from(x) / n * 360.0 - 180.0;

    let lat_rad = (PI * (1.0 - 2.0 * f64::from(y) / n)).sinh().atan();
    let lat = lat_rad.to_degrees();

    (lat, lon)
}
