//! Feature-service query parameters.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::config::FetchConfig;
use crate::coord::Tile;

/// Wire dialect requested from the feature service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// Standard GeoJSON (`f=geoJSON`)
    #[default]
    GeoJson,
    /// Esri JSON feature set (`f=JSON`), transcoded before decoding
    Json,
}

impl ResponseFormat {
    /// Value sent as the `f` query parameter.
    pub fn as_query_value(&self) -> &'static str {
        match self {
            ResponseFormat::GeoJson => "geoJSON",
            ResponseFormat::Json => "JSON",
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseFormat::GeoJson => write!(f, "geojson"),
            ResponseFormat::Json => write!(f, "json"),
        }
    }
}

/// Unrecognized response format name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown response format '{0}' (expected 'geojson' or 'json')")]
pub struct UnknownFormat(pub String);

impl FromStr for ResponseFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GEOJSON" => Ok(ResponseFormat::GeoJson),
            "JSON" => Ok(ResponseFormat::Json),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// Ordered query-string parameters for one tile query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Envelope-intersects query for every feature within `tile`'s bound.
    pub fn for_tile(tile: &Tile, config: &FetchConfig) -> Self {
        let sr = config.spatial_reference().to_string();
        let pairs = vec![
            ("orderByFields", config.id_key().to_string()),
            ("geometry", tile.extent_string()),
            ("geometryType", "esriGeometryEnvelope".to_string()),
            ("returnGeometry", "true".to_string()),
            ("where", String::new()),
            ("f", config.format().as_query_value().to_string()),
            ("outfields", "*".to_string()),
            ("spatialRel", "esriSpatialRelEnvelopeIntersects".to_string()),
            ("inSR", sr.clone()),
            ("outSR", sr),
        ];
        Self { pairs }
    }

    /// Looks up a parameter value by name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn as_pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing_is_case_insensitive() {
        assert_eq!("geojson".parse(), Ok(ResponseFormat::GeoJson));
        assert_eq!("GeoJSON".parse(), Ok(ResponseFormat::GeoJson));
        assert_eq!("json".parse(), Ok(ResponseFormat::Json));
        assert_eq!(
            "pbf".parse::<ResponseFormat>(),
            Err(UnknownFormat("pbf".to_string()))
        );
    }

    #[test]
    fn test_params_for_tile() {
        let tile = Tile::new(1, 0, 0).unwrap();
        let config = FetchConfig::new("https://example.com/FeatureServer/0")
            .with_id_key("PARCELID")
            .with_spatial_reference("4326")
            .with_format(ResponseFormat::Json);

        let params = QueryParams::for_tile(&tile, &config);

        assert_eq!(params.get("orderByFields"), Some("PARCELID"));
        assert_eq!(
            params.get("geometry"),
            Some("-180.000000,0.000000,0.000000,85.051129")
        );
        assert_eq!(params.get("geometryType"), Some("esriGeometryEnvelope"));
        assert_eq!(params.get("returnGeometry"), Some("true"));
        assert_eq!(params.get("where"), Some(""));
        assert_eq!(params.get("f"), Some("JSON"));
        assert_eq!(params.get("outfields"), Some("*"));
        assert_eq!(
            params.get("spatialRel"),
            Some("esriSpatialRelEnvelopeIntersects")
        );
        assert_eq!(params.get("inSR"), Some("4326"));
        assert_eq!(params.get("outSR"), Some("4326"));
        assert_eq!(params.as_pairs().len(), 10);
    }
}
