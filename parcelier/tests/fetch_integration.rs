//! End-to-end runs of the fetch engine against a scripted feature service.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use geo_types::{coord, Geometry, Rect};
use parcelier::artifact::counts_match;
use parcelier::config::FetchConfig;
use parcelier::coord::Tile;
use parcelier::fetch::{RunSummary, TileFetcher};
use parcelier::query::{QueryClient, QueryParams};
use parcelier::tileset::{TileSet, TileSetBuilder};
use parcelier::FetchError;
use tempfile::TempDir;

/// Returns a fixed number of parcels per tile extent.
struct ScriptedClient {
    counts: HashMap<String, usize>,
    default_count: usize,
    calls: Mutex<Vec<String>>,
}

impl ScriptedClient {
    fn new(default_count: usize) -> Self {
        Self {
            counts: HashMap::new(),
            default_count,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn with_count(mut self, tile: &str, count: usize) -> Self {
        let tile: Tile = tile.parse().unwrap();
        self.counts.insert(tile.extent_string(), count);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl QueryClient for ScriptedClient {
    async fn query(&self, params: &QueryParams) -> Result<Vec<u8>, FetchError> {
        let extent = params.get("geometry").unwrap_or_default().to_string();
        let count = self
            .counts
            .get(&extent)
            .copied()
            .unwrap_or(self.default_count);
        self.calls.lock().unwrap().push(extent);
        Ok(feature_collection(count).into_bytes())
    }
}

fn feature_collection(count: usize) -> String {
    let features: Vec<String> = (0..count)
        .map(|i| {
            format!(
                r#"{{"type":"Feature","id":{i},"geometry":{{"type":"Point","coordinates":[0,0]}},"properties":{{"OBJECTID":{i}}}}}"#
            )
        })
        .collect();
    format!(
        r#"{{"type":"FeatureCollection","features":[{}]}}"#,
        features.join(",")
    )
}

fn config(dir: &TempDir) -> FetchConfig {
    FetchConfig::new("http://localhost/arcgis/rest/services/Parcels/FeatureServer/0")
        .with_parcels_dir(dir.path().join("parcels"))
        .with_tiles_dir(dir.path().join("tiles"))
        .with_parcel_limit(500)
        .with_wait(Duration::ZERO)
}

/// The 2x2 block of zoom-10 tiles starting at 10/301/385.
fn block_of_four() -> TileSet {
    let nw = Tile::new(10, 301, 385).unwrap().bound();
    let se = Tile::new(10, 302, 386).unwrap().bound();
    let boundary = Geometry::Rect(Rect::new(
        coord! { x: nw.left + 0.01, y: se.bottom + 0.01 },
        coord! { x: se.right - 0.01, y: nw.top - 0.01 },
    ));
    TileSetBuilder::new().build(&boundary, 10).unwrap()
}

async fn run(client: ScriptedClient, config: FetchConfig, tiles: TileSet) -> (RunSummary, Vec<String>) {
    let mut fetcher = TileFetcher::new(client, config);
    fetcher.store().prepare().unwrap();
    let summary = fetcher.run(tiles).await;
    (summary, fetcher.client().calls())
}

fn saved_count(path: &Path) -> usize {
    let text = std::fs::read_to_string(path).unwrap();
    let collection: geojson::FeatureCollection = serde_json::from_str(&text).unwrap();
    collection.features.len()
}

fn scenario_client() -> ScriptedClient {
    ScriptedClient::new(25)
        .with_count("10/301/385", 0)
        .with_count("10/301/386", 120)
        .with_count("10/302/385", 600)
        .with_count("10/302/386", 80)
}

#[tokio::test]
async fn test_mixed_counts_scenario() {
    let dir = TempDir::new().unwrap();
    let tiles = block_of_four();
    assert_eq!(tiles.len(), 4);

    let (summary, calls) = run(scenario_client(), config(&dir), tiles).await;

    // 4 tiles at zoom 10 plus the 4 children of the overflowing one
    assert_eq!(summary.tiles, 8);
    assert_eq!(summary.empty, 1);
    assert_eq!(summary.refined, 1);
    assert_eq!(summary.saved, 6);
    assert_eq!(summary.parcels_saved, 120 + 4 * 25 + 80);
    assert_eq!(summary.failed, 0);
    assert_eq!(calls.len(), 8);

    let parcels = dir.path().join("parcels");
    let tiles_dir = dir.path().join("tiles");

    assert!(!parcels.join("parcels_10_301_385.geojson").exists());
    assert_eq!(saved_count(&parcels.join("parcels_10_301_386.geojson")), 120);
    assert!(!parcels.join("parcels_10_302_385.geojson").exists());
    assert!(!tiles_dir.join("tile_10_302_385.geojson").exists());

    for (x, y) in [(604, 770), (604, 771), (605, 770), (605, 771)] {
        let child = Tile::new(11, x, y).unwrap();
        assert_eq!(saved_count(&child.parcels_path(&parcels)), 25);
        assert_eq!(
            counts_match(&child.summary_path(&tiles_dir), &child.parcels_path(&parcels)).unwrap(),
            25
        );
    }

    // Children are fetched straight after their parent, before 10/302/386
    let order: Vec<String> = calls.iter().skip(2).take(6).cloned().collect();
    assert_eq!(order[0], Tile::new(10, 302, 385).unwrap().extent_string());
    assert_eq!(order[5], Tile::new(10, 302, 386).unwrap().extent_string());
}

#[tokio::test]
async fn test_second_run_skips_saved_tiles() {
    let dir = TempDir::new().unwrap();
    run(scenario_client(), config(&dir), block_of_four()).await;

    let saved = dir.path().join("parcels").join("parcels_10_301_386.geojson");
    let before = std::fs::read(&saved).unwrap();

    let (summary, calls) = run(scenario_client(), config(&dir), block_of_four()).await;

    // Only the empty tile and the overflowing tile have no artifacts to match
    assert_eq!(summary.skipped, 6);
    assert_eq!(summary.saved, 0);
    assert_eq!(calls.len(), 2);
    assert_eq!(std::fs::read(&saved).unwrap(), before);
}

#[tokio::test]
async fn test_update_refetches_everything() {
    let dir = TempDir::new().unwrap();
    run(scenario_client(), config(&dir), block_of_four()).await;

    let (summary, calls) =
        run(scenario_client(), config(&dir).with_update(true), block_of_four()).await;

    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.saved, 6);
    assert_eq!(calls.len(), 8);
}

#[tokio::test]
async fn test_recorded_count_controls_skip() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let tile = Tile::new(10, 301, 386).unwrap();
    let tiles = TileSetBuilder::new()
        .build(&Geometry::Polygon(tile.bound().to_polygon()), 10)
        .unwrap();
    assert_eq!(tiles.tiles(), &[tile]);

    std::fs::create_dir_all(config.parcels_dir()).unwrap();
    std::fs::create_dir_all(config.tiles_dir().unwrap()).unwrap();
    let summary_path = tile.summary_path(config.tiles_dir().unwrap());
    let parcels_path = tile.parcels_path(config.parcels_dir());
    std::fs::write(
        &summary_path,
        r#"{"type":"Feature","geometry":null,"properties":{"extent":"10/301/386","num_parcels":42}}"#,
    )
    .unwrap();

    std::fs::write(&parcels_path, feature_collection(42)).unwrap();
    let (summary, calls) = run(ScriptedClient::new(42), config.clone(), tiles.clone()).await;
    assert_eq!(summary.skipped, 1);
    assert!(calls.is_empty());

    std::fs::write(&parcels_path, feature_collection(41)).unwrap();
    let (summary, calls) = run(ScriptedClient::new(42), config, tiles).await;
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.saved, 1);
    assert_eq!(calls.len(), 1);
    assert_eq!(saved_count(&parcels_path), 42);
}

#[tokio::test]
async fn test_refinement_stops_at_zoom_ceiling() {
    let dir = TempDir::new().unwrap();
    let tile = Tile::new(22, 1_200_000, 1_540_000).unwrap();
    let tiles = TileSetBuilder::new()
        .build(&Geometry::Polygon(tile.bound().to_polygon()), 22)
        .unwrap();

    let (summary, calls) = run(ScriptedClient::new(500), config(&dir), tiles).await;

    // 22 -> 23 -> 24, then every zoom-24 tile is dropped
    assert_eq!(summary.tiles, 1 + 4 + 16);
    assert_eq!(summary.refined, 5);
    assert_eq!(summary.zoom_limited, 16);
    assert_eq!(summary.saved, 0);
    assert!(summary.has_losses());
    assert_eq!(calls.len(), 21);
}

#[tokio::test(start_paused = true)]
async fn test_queries_are_paced() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir).with_wait(Duration::from_millis(500));
    let start = tokio::time::Instant::now();

    let (summary, calls) = run(ScriptedClient::new(1), config, block_of_four()).await;

    assert_eq!(summary.saved, 4);
    assert_eq!(calls.len(), 4);
    assert!(start.elapsed() >= Duration::from_millis(1500));
}
