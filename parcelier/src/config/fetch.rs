//! Fetch engine configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::defaults::*;
use super::settings::ConfigFile;
use crate::query::ResponseFormat;

/// How much of the HTTP exchange is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    #[default]
    Quiet,
    /// Log each resolved query URL
    Verbose,
    /// Also dump full requests and responses
    VeryVerbose,
}

impl Verbosity {
    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose | Verbosity::VeryVerbose)
    }

    pub fn is_very_verbose(&self) -> bool {
        matches!(self, Verbosity::VeryVerbose)
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Verbosity::Quiet | Verbosity::Verbose => "info",
            Verbosity::VeryVerbose => "debug",
        }
    }
}

/// Configuration for one fetch run.
///
/// Built once before the run and never mutated while it is in progress.
///
/// # Example
///
/// ```
/// use parcelier::config::FetchConfig;
/// use parcelier::query::ResponseFormat;
///
/// let config = FetchConfig::new("https://example.com/FeatureServer/0")
///     .with_format(ResponseFormat::Json)
///     .with_tiles_dir("tiles")
///     .with_update(true);
///
/// assert_eq!(config.agent(), "parcelier");
/// assert_eq!(config.parcel_limit(), 1000);
/// assert!(config.tiles_dir().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    base_url: String,
    agent: String,
    parcels_dir: PathBuf,
    tiles_dir: Option<PathBuf>,
    update: bool,
    wait: Duration,
    parcel_limit: usize,
    spatial_reference: String,
    format: ResponseFormat,
    id_key: String,
    verbosity: Verbosity,
}

impl FetchConfig {
    /// Creates a configuration for the service at `base_url` with defaults
    /// for everything else.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            agent: DEFAULT_AGENT.to_string(),
            parcels_dir: PathBuf::from(DEFAULT_PARCELS_DIR),
            tiles_dir: None,
            update: false,
            wait: Duration::from_millis(DEFAULT_WAIT_MS),
            parcel_limit: DEFAULT_PARCEL_LIMIT,
            spatial_reference: DEFAULT_SPATIAL_REFERENCE.to_string(),
            format: ResponseFormat::default(),
            id_key: DEFAULT_ID_KEY.to_string(),
            verbosity: Verbosity::default(),
        }
    }

    /// Creates a configuration from the config file settings.
    ///
    /// `base_url` is passed separately since the file may not name one.
    pub fn from_settings(settings: &ConfigFile, base_url: impl Into<String>) -> Self {
        let mut config = Self::new(base_url)
            .with_agent(settings.service.agent.clone())
            .with_format(settings.service.format)
            .with_spatial_reference(settings.service.spatial_reference.clone())
            .with_id_key(settings.service.id_key.clone())
            .with_parcel_limit(settings.fetch.limit)
            .with_wait(Duration::from_millis(settings.fetch.wait_ms))
            .with_update(settings.fetch.update)
            .with_parcels_dir(settings.output.parcels_dir.clone());
        config.tiles_dir = settings.output.tiles_dir.clone();
        config
    }

    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = agent.into();
        self
    }

    pub fn with_parcels_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.parcels_dir = dir.into();
        self
    }

    /// Enables tile summaries, written to `dir`.
    pub fn with_tiles_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tiles_dir = Some(dir.into());
        self
    }

    /// Re-fetch tiles even when the saved artifacts match.
    pub fn with_update(mut self, update: bool) -> Self {
        self.update = update;
        self
    }

    /// Minimum spacing between two queries.
    pub fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    /// Feature count at which a tile is refined instead of saved.
    pub fn with_parcel_limit(mut self, limit: usize) -> Self {
        self.parcel_limit = limit;
        self
    }

    pub fn with_spatial_reference(mut self, sr: impl Into<String>) -> Self {
        self.spatial_reference = sr.into();
        self
    }

    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_id_key(mut self, key: impl Into<String>) -> Self {
        self.id_key = key.into();
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn agent(&self) -> &str {
        &self.agent
    }

    pub fn parcels_dir(&self) -> &Path {
        &self.parcels_dir
    }

    pub fn tiles_dir(&self) -> Option<&Path> {
        self.tiles_dir.as_deref()
    }

    pub fn update(&self) -> bool {
        self.update
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    pub fn parcel_limit(&self) -> usize {
        self.parcel_limit
    }

    pub fn spatial_reference(&self) -> &str {
        &self.spatial_reference
    }

    pub fn format(&self) -> ResponseFormat {
        self.format
    }

    pub fn id_key(&self) -> &str {
        &self.id_key
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FetchConfig::new("https://example.com/FeatureServer/0");
        assert_eq!(config.base_url(), "https://example.com/FeatureServer/0");
        assert_eq!(config.agent(), DEFAULT_AGENT);
        assert_eq!(config.parcels_dir(), Path::new("."));
        assert!(config.tiles_dir().is_none());
        assert!(!config.update());
        assert_eq!(config.wait(), Duration::from_millis(500));
        assert_eq!(config.parcel_limit(), 1000);
        assert_eq!(config.spatial_reference(), "4326");
        assert_eq!(config.format(), ResponseFormat::GeoJson);
        assert_eq!(config.id_key(), "OBJECTID");
        assert_eq!(config.verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_builder_chain() {
        let config = FetchConfig::new("http://localhost")
            .with_agent("test-agent")
            .with_parcels_dir("/tmp/parcels")
            .with_tiles_dir("/tmp/tiles")
            .with_parcel_limit(500)
            .with_id_key("PIN");

        assert_eq!(config.agent(), "test-agent");
        assert_eq!(config.parcels_dir(), Path::new("/tmp/parcels"));
        assert_eq!(config.tiles_dir(), Some(Path::new("/tmp/tiles")));
        assert_eq!(config.parcel_limit(), 500);
        assert_eq!(config.id_key(), "PIN");
        assert_eq!(config.wait(), Duration::from_millis(DEFAULT_WAIT_MS)); // Unchanged
    }

    #[test]
    fn test_from_settings() {
        let mut settings = ConfigFile::default();
        settings.service.agent = "mirror".to_string();
        settings.service.format = ResponseFormat::Json;
        settings.fetch.limit = 200;
        settings.fetch.wait_ms = 0;
        settings.fetch.update = true;
        settings.output.tiles_dir = Some(PathBuf::from("tiles"));

        let config = FetchConfig::from_settings(&settings, "http://host/0");

        assert_eq!(config.base_url(), "http://host/0");
        assert_eq!(config.agent(), "mirror");
        assert_eq!(config.format(), ResponseFormat::Json);
        assert_eq!(config.parcel_limit(), 200);
        assert_eq!(config.wait(), Duration::ZERO);
        assert!(config.update());
        assert_eq!(config.tiles_dir(), Some(Path::new("tiles")));
    }

    #[test]
    fn test_verbosity_levels() {
        assert!(!Verbosity::Quiet.is_verbose());
        assert!(Verbosity::Verbose.is_verbose());
        assert!(!Verbosity::Verbose.is_very_verbose());
        assert!(Verbosity::VeryVerbose.is_verbose());
        assert!(Verbosity::VeryVerbose.is_very_verbose());

        assert_eq!(Verbosity::Quiet.default_log_level(), "info");
        assert_eq!(Verbosity::Verbose.default_log_level(), "info");
        assert_eq!(Verbosity::VeryVerbose.default_log_level(), "debug");
    }
}
