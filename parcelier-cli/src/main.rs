//! parcelier CLI - Command-line interface
//!
//! Downloads the parcels inside a boundary from an ArcGIS feature service,
//! one map tile at a time.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{ArgGroup, Parser, ValueEnum};
use parcelier::config::Verbosity;
use parcelier::coord::Tile;
use parcelier::query::ResponseFormat;

use commands::fetch::{AreaSource, FetchArgs};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Standard GeoJSON
    Geojson,
    /// Esri JSON, converted to GeoJSON before saving
    Json,
}

impl From<FormatArg> for ResponseFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Geojson => ResponseFormat::GeoJson,
            FormatArg::Json => ResponseFormat::Json,
        }
    }
}

#[derive(Parser)]
#[command(name = "parcelier", version = parcelier::VERSION)]
#[command(about = "Download parcels from an ArcGIS feature service, tile by tile", long_about = None)]
#[command(group(ArgGroup::new("area").required(true).args(["boundary", "extent"])))]
struct Args {
    /// Boundary GeoJSON file (Geometry, Feature or FeatureCollection)
    #[arg(short, long, value_name = "FILE")]
    boundary: Option<PathBuf>,

    /// Extent tile (z/x/y) used as the boundary
    #[arg(short, long, value_name = "Z/X/Y")]
    extent: Option<Tile>,

    /// Feature service layer URL (the part before /query)
    #[arg(short, long)]
    url: Option<String>,

    /// User-Agent sent with each query
    #[arg(short, long)]
    agent: Option<String>,

    /// Initial zoom level
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=25))]
    zoom: Option<u8>,

    /// Parcel output directory
    #[arg(short, long = "parcels", value_name = "DIR")]
    parcels: Option<PathBuf>,

    /// Tile summary output directory (enables resuming)
    #[arg(short, long = "tiles", value_name = "DIR")]
    tiles: Option<PathBuf>,

    /// Parcel object id attribute
    #[arg(long)]
    id: Option<String>,

    /// Spatial reference id
    #[arg(long)]
    sr: Option<String>,

    /// Response format requested from the service
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Parcel count at which a tile is split
    #[arg(long)]
    limit: Option<usize>,

    /// Minimum time between queries in milliseconds
    #[arg(long, value_name = "MS")]
    wait: Option<u64>,

    /// Fetch tiles again even if saved files match
    #[arg(long)]
    update: bool,

    /// Log each query URL
    #[arg(short, long)]
    verbose: bool,

    /// Log full HTTP requests and responses
    #[arg(long = "vv")]
    very_verbose: bool,

    /// Print the tile count and exit
    #[arg(long)]
    info: bool,

    /// Write the initial tile set as GeoJSON
    #[arg(long, value_name = "FILE")]
    tileset_geojson: Option<PathBuf>,

    /// Config file (default: ~/.parcelier/config.ini)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl Args {
    fn into_fetch_args(self) -> FetchArgs {
        let area = match (self.boundary, self.extent) {
            (Some(path), _) => Some(AreaSource::Boundary(path)),
            (None, Some(tile)) => Some(AreaSource::Extent(tile)),
            (None, None) => None,
        };
        let verbosity = if self.very_verbose {
            Verbosity::VeryVerbose
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Quiet
        };

        FetchArgs {
            area,
            url: self.url,
            agent: self.agent,
            zoom: self.zoom,
            parcels_dir: self.parcels,
            tiles_dir: self.tiles,
            id_key: self.id,
            spatial_reference: self.sr,
            format: self.format.map(ResponseFormat::from),
            limit: self.limit,
            wait_ms: self.wait,
            update: self.update,
            verbosity,
            info: self.info,
            tileset_geojson: self.tileset_geojson,
            config: self.config,
        }
    }
}

fn main() {
    let args = Args::parse();

    if let Err(e) = commands::fetch::run(args.into_fetch_args()) {
        e.exit();
    }
}
