//! Fetch command - cover a boundary with tiles and download its parcels.

use std::path::PathBuf;
use std::time::Duration;

use geo_types::Geometry;
use parcelier::boundary::load_boundary;
use parcelier::config::{ConfigFile, FetchConfig, Verbosity};
use parcelier::coord::Tile;
use parcelier::fetch::TileFetcher;
use parcelier::query::{ReqwestQueryClient, ResponseFormat};
use parcelier::tileset::TileSetBuilder;
use tracing::info;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Where the area to fetch comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum AreaSource {
    /// GeoJSON boundary file
    Boundary(PathBuf),
    /// A single tile whose bound is the boundary
    Extent(Tile),
}

/// Arguments for the fetch command.
///
/// `None` fields fall back to the config file, then to defaults.
#[derive(Debug, Clone, Default)]
pub struct FetchArgs {
    pub area: Option<AreaSource>,
    pub url: Option<String>,
    pub agent: Option<String>,
    pub zoom: Option<u8>,
    pub parcels_dir: Option<PathBuf>,
    pub tiles_dir: Option<PathBuf>,
    pub id_key: Option<String>,
    pub spatial_reference: Option<String>,
    pub format: Option<ResponseFormat>,
    pub limit: Option<usize>,
    pub wait_ms: Option<u64>,
    pub update: bool,
    pub verbosity: Verbosity,
    pub info: bool,
    pub tileset_geojson: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Run the fetch command.
pub fn run(args: FetchArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.config.as_deref(), args.verbosity)?;
    runner.log_startup("fetch");
    let settings = runner.config();

    let (label, boundary) = resolve_area(args.area.as_ref())?;
    let zoom = args.zoom.unwrap_or(settings.fetch.zoom);
    let tiles = TileSetBuilder::new().build(&boundary, zoom)?;

    println!("running boundary {}...", label);
    println!("{} tiles at zoom {}", tiles.len(), tiles.zoom());

    if let Some(path) = &args.tileset_geojson {
        runner.write_tileset(path, &tiles)?;
    }

    if args.info {
        return Ok(());
    }

    let config = build_config(&args, settings)?;
    info!(url = config.base_url(), format = %config.format(), "Feature service");

    let client = ReqwestQueryClient::from_config(&config).map_err(CliError::Client)?;
    let mut fetcher = TileFetcher::new(client, config);
    fetcher
        .store()
        .prepare()
        .map_err(|error| CliError::FileWrite {
            path: fetcher.store().parcels_dir().display().to_string(),
            error,
        })?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let tile_count = tiles.len();
    let summary = runtime.block_on(fetcher.run(tiles));

    info!("done! {} tiles processed", tile_count);
    println!("{}", summary);
    if summary.has_losses() {
        println!("Some tiles were not saved; see the log for details.");
    }

    Ok(())
}

/// Loads the boundary geometry and a label for it.
fn resolve_area(area: Option<&AreaSource>) -> Result<(String, Geometry<f64>), CliError> {
    match area {
        Some(AreaSource::Boundary(path)) => {
            let label = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            Ok((label, load_boundary(path)?))
        }
        Some(AreaSource::Extent(tile)) => Ok((
            format!("extent {}", tile),
            Geometry::Polygon(tile.bound().to_polygon()),
        )),
        None => Err(CliError::Config(
            "no inputs to download; pass --boundary or --extent".to_string(),
        )),
    }
}

/// Overlays command-line flags on the config file settings.
fn build_config(args: &FetchArgs, settings: &ConfigFile) -> Result<FetchConfig, CliError> {
    let url = args
        .url
        .clone()
        .or_else(|| settings.service.url.clone())
        .ok_or_else(|| {
            CliError::Config("no url provided; pass --url or set [service] url".to_string())
        })?;

    let mut config = FetchConfig::from_settings(settings, url).with_verbosity(args.verbosity);

    if let Some(agent) = &args.agent {
        config = config.with_agent(agent.clone());
    }
    if let Some(dir) = &args.parcels_dir {
        config = config.with_parcels_dir(dir.clone());
    }
    if let Some(dir) = &args.tiles_dir {
        config = config.with_tiles_dir(dir.clone());
    }
    if let Some(key) = &args.id_key {
        config = config.with_id_key(key.clone());
    }
    if let Some(sr) = &args.spatial_reference {
        config = config.with_spatial_reference(sr.clone());
    }
    if let Some(format) = args.format {
        config = config.with_format(format);
    }
    if let Some(limit) = args.limit {
        if limit == 0 {
            return Err(CliError::Config("--limit must be positive".to_string()));
        }
        config = config.with_parcel_limit(limit);
    }
    if let Some(wait) = args.wait_ms {
        config = config.with_wait(Duration::from_millis(wait));
    }
    if args.update {
        config = config.with_update(true);
    }

    Ok(config)
}
