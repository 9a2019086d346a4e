//! Default values for all configuration settings.

use std::path::PathBuf;

use super::settings::*;
use crate::query::ResponseFormat;

/// Default User-Agent.
pub const DEFAULT_AGENT: &str = "parcelier";

/// Default initial zoom level.
pub const DEFAULT_ZOOM: u8 = 13;

/// Default feature output directory.
pub const DEFAULT_PARCELS_DIR: &str = ".";

/// Default object-id attribute.
pub const DEFAULT_ID_KEY: &str = "OBJECTID";

/// Default spatial reference (WGS84).
pub const DEFAULT_SPATIAL_REFERENCE: &str = "4326";

/// Default per-tile feature limit.
///
/// Most ArcGIS services cap `maxRecordCount` at 1000 or 2000.
pub const DEFAULT_PARCEL_LIMIT: usize = 1000;

/// Default spacing between queries in milliseconds.
pub const DEFAULT_WAIT_MS: u64 = 500;

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            service: ServiceSettings {
                url: None,
                agent: DEFAULT_AGENT.to_string(),
                format: ResponseFormat::default(),
                spatial_reference: DEFAULT_SPATIAL_REFERENCE.to_string(),
                id_key: DEFAULT_ID_KEY.to_string(),
            },
            fetch: FetchSettings {
                zoom: DEFAULT_ZOOM,
                limit: DEFAULT_PARCEL_LIMIT,
                wait_ms: DEFAULT_WAIT_MS,
                update: false,
            },
            output: OutputSettings {
                parcels_dir: PathBuf::from(DEFAULT_PARCELS_DIR),
                tiles_dir: None,
            },
            logging: LoggingSettings::default(),
        }
    }
}
