//! Decoding of query responses into parcel collections.
//!
//! The feature service speaks two dialects: standard GeoJSON and Esri JSON.
//! [`decode`] accepts either and always yields a GeoJSON
//! [`ParcelCollection`], so everything downstream of a query only deals
//! with one representation.

mod arcgis;

pub use arcgis::{to_feature_collection, ConversionError};

use geojson::{Feature, FeatureCollection, JsonValue};
use serde::Deserialize;
use tracing::warn;

use crate::error::FetchError;
use crate::query::ResponseFormat;

/// Ordered parcel features returned for one tile.
///
/// The count is the length of the feature sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct ParcelCollection {
    inner: FeatureCollection,
}

impl ParcelCollection {
    pub fn new(inner: FeatureCollection) -> Self {
        Self { inner }
    }

    /// Number of parcels.
    pub fn len(&self) -> usize {
        self.inner.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.features.is_empty()
    }

    pub fn features(&self) -> &[Feature] {
        &self.inner.features
    }

    pub fn as_feature_collection(&self) -> &FeatureCollection {
        &self.inner
    }

    pub fn into_inner(self) -> FeatureCollection {
        self.inner
    }

    /// Pretty-printed GeoJSON, as written to the parcels artifact.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.inner)
    }
}

impl From<FeatureCollection> for ParcelCollection {
    fn from(inner: FeatureCollection) -> Self {
        Self::new(inner)
    }
}

/// Error envelope returned by ArcGIS services, usually with HTTP 200.
#[derive(Debug, Deserialize)]
struct ServiceErrorEnvelope {
    error: ServiceError,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Vec<String>,
}

impl ServiceError {
    fn describe(&self) -> String {
        let mut text = match self.code {
            Some(code) => format!("service error {}", code),
            None => "service error".to_string(),
        };
        if let Some(message) = &self.message {
            text.push_str(": ");
            text.push_str(message);
        }
        if !self.details.is_empty() {
            text.push_str(" (");
            text.push_str(&self.details.join("; "));
            text.push(')');
        }
        text
    }
}

/// Decodes a raw query body into a parcel collection.
///
/// # Errors
///
/// - [`FetchError::Api`] if the body is a service error envelope
/// - [`FetchError::Decode`] if a `geojson` body is not a feature collection
/// - [`FetchError::Conversion`] if a `json` body cannot be transcoded
pub fn decode(
    bytes: &[u8],
    format: ResponseFormat,
    id_key: &str,
) -> Result<ParcelCollection, FetchError> {
    if let Ok(envelope) = serde_json::from_slice::<ServiceErrorEnvelope>(bytes) {
        return Err(FetchError::Api(envelope.error.describe()));
    }

    let collection = match format {
        ResponseFormat::GeoJson => parse_feature_collection(bytes)?,
        ResponseFormat::Json => to_feature_collection(bytes, id_key)
            .map_err(|e| FetchError::Conversion(e.to_string()))?,
    };

    Ok(ParcelCollection::new(collection))
}

/// Parses a GeoJSON feature collection.
pub fn parse_feature_collection(bytes: &[u8]) -> Result<FeatureCollection, FetchError> {
    let collection: FeatureCollection =
        serde_json::from_slice(bytes).map_err(|e| FetchError::Decode(e.to_string()))?;

    if transfer_limit_exceeded(&collection) {
        warn!(
            features = collection.features.len(),
            "Feature service reports exceededTransferLimit; results are truncated"
        );
    }

    Ok(collection)
}

// ArcGIS places the flag in a top-level "properties" member of its GeoJSON.
fn transfer_limit_exceeded(collection: &FeatureCollection) -> bool {
    let Some(members) = &collection.foreign_members else {
        return false;
    };
    let direct = members.get("exceededTransferLimit");
    let nested = members
        .get("properties")
        .and_then(|p| p.get("exceededTransferLimit"));
    matches!(direct.or(nested), Some(JsonValue::Bool(true)))
}
