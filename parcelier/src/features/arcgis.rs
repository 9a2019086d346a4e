//! Esri JSON feature sets to GeoJSON.
//!
//! ArcGIS feature services answer `f=JSON` queries with their own feature
//! set layout: `attributes` instead of `properties` and `x`/`y`, `points`,
//! `paths` or `rings` instead of typed geometries. Polygon rings carry no
//! explicit grouping; clockwise rings are shells and counter-clockwise
//! rings are holes belonging to the shell that contains them.

use geo::{Area, Intersects};
use geo_types::{Coord, Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};
use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, JsonObject, JsonValue, Value};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// Errors raised while transcoding an Esri feature set.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Body is not an Esri feature set
    #[error("invalid feature set: {0}")]
    Json(#[from] serde_json::Error),

    /// A position has fewer than two ordinates
    #[error("invalid coordinate {0:?} (expected at least x and y)")]
    InvalidCoordinate(Vec<f64>),
}

#[derive(Debug, Deserialize)]
struct EsriFeatureSet {
    features: Vec<EsriFeature>,
    #[serde(default, rename = "exceededTransferLimit")]
    exceeded_transfer_limit: bool,
}

#[derive(Debug, Deserialize)]
struct EsriFeature {
    #[serde(default)]
    attributes: Option<JsonObject>,
    #[serde(default)]
    geometry: Option<EsriGeometry>,
}

#[derive(Debug, Default, Deserialize)]
struct EsriGeometry {
    x: Option<f64>,
    y: Option<f64>,
    points: Option<Vec<Vec<f64>>>,
    paths: Option<Vec<Vec<Vec<f64>>>>,
    rings: Option<Vec<Vec<Vec<f64>>>>,
}

/// Transcodes an Esri JSON feature set into a GeoJSON feature collection.
///
/// Every attribute becomes a property. When `id_key` names an attribute
/// holding a number or string, it also becomes the feature `id`.
pub fn to_feature_collection(bytes: &[u8], id_key: &str) -> Result<FeatureCollection, ConversionError> {
    let set: EsriFeatureSet = serde_json::from_slice(bytes)?;

    if set.exceeded_transfer_limit {
        warn!(
            features = set.features.len(),
            "Feature service reports exceededTransferLimit; results are truncated"
        );
    }

    let features = set
        .features
        .into_iter()
        .map(|feature| convert_feature(feature, id_key))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

fn convert_feature(feature: EsriFeature, id_key: &str) -> Result<Feature, ConversionError> {
    let attributes = feature.attributes.unwrap_or_default();

    let id = match attributes.get(id_key) {
        Some(JsonValue::Number(n)) => Some(Id::Number(n.clone())),
        Some(JsonValue::String(s)) => Some(Id::String(s.clone())),
        _ => None,
    };

    let geometry = match feature.geometry {
        Some(g) => convert_geometry(g)?,
        None => None,
    };

    Ok(Feature {
        bbox: None,
        geometry: geometry.map(|g| geojson::Geometry::new(Value::from(&g))),
        id,
        properties: Some(attributes),
        foreign_members: None,
    })
}

fn convert_geometry(geometry: EsriGeometry) -> Result<Option<Geometry<f64>>, ConversionError> {
    if let Some(rings) = geometry.rings {
        return rings_to_geometry(&rings);
    }

    if let Some(paths) = geometry.paths {
        let mut lines = paths
            .iter()
            .map(|path| line_string(path))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(match lines.len() {
            0 => None,
            1 => lines.pop().map(Geometry::LineString),
            _ => Some(Geometry::MultiLineString(MultiLineString::new(lines))),
        });
    }

    if let Some(points) = geometry.points {
        if points.is_empty() {
            return Ok(None);
        }
        let points = points
            .iter()
            .map(|p| coordinate(p).map(Point::from))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Some(Geometry::MultiPoint(MultiPoint::new(points))));
    }

    match (geometry.x, geometry.y) {
        (Some(x), Some(y)) => Ok(Some(Geometry::Point(Point::new(x, y)))),
        _ => Ok(None),
    }
}

fn coordinate(position: &[f64]) -> Result<Coord<f64>, ConversionError> {
    match position {
        [x, y, ..] => Ok(Coord { x: *x, y: *y }),
        _ => Err(ConversionError::InvalidCoordinate(position.to_vec())),
    }
}

fn line_string(positions: &[Vec<f64>]) -> Result<LineString<f64>, ConversionError> {
    positions
        .iter()
        .map(|p| coordinate(p))
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::new)
}

/// Clockwise in the x-right/y-up plane, which Esri uses for shells.
fn is_clockwise(ring: &LineString<f64>) -> bool {
    Polygon::new(ring.clone(), vec![]).signed_area() < 0.0
}

fn rings_to_geometry(rings: &[Vec<Vec<f64>>]) -> Result<Option<Geometry<f64>>, ConversionError> {
    let mut shells: Vec<(LineString<f64>, Vec<LineString<f64>>)> = Vec::new();
    let mut holes: Vec<LineString<f64>> = Vec::new();

    for ring in rings {
        let ring = line_string(ring)?;
        if ring.0.is_empty() {
            continue;
        }
        if is_clockwise(&ring) {
            shells.push((ring, Vec::new()));
        } else {
            holes.push(ring);
        }
    }

    for hole in holes {
        let probe = Point::from(hole.0[0]);
        let owner = shells
            .iter_mut()
            .find(|(shell, _)| Polygon::new(shell.clone(), vec![]).intersects(&probe));
        match owner {
            Some((_, interiors)) => interiors.push(hole),
            // Orphan counter-clockwise ring: keep it as a shell of its own
            None => shells.push((hole, Vec::new())),
        }
    }

    let mut polygons: Vec<Polygon<f64>> = shells
        .into_iter()
        .map(|(exterior, interiors)| Polygon::new(exterior, interiors))
        .collect();

    Ok(match polygons.len() {
        0 => None,
        1 => polygons.pop().map(Geometry::Polygon),
        _ => Some(Geometry::MultiPolygon(MultiPolygon::new(polygons))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARCELS: &str = r#"{
        "objectIdFieldName": "OBJECTID",
        "geometryType": "esriGeometryPolygon",
        "spatialReference": {"wkid": 4326},
        "features": [
            {
                "attributes": {"OBJECTID": 17, "PIN": "0412-33-001"},
                "geometry": {"rings": [[[0, 0], [0, 10], [10, 10], [10, 0], [0, 0]],
                                       [[2, 2], [4, 2], [4, 4], [2, 4], [2, 2]]]}
            },
            {
                "attributes": {"OBJECTID": 18, "PIN": "0412-33-002"},
                "geometry": {"rings": [[[20, 0], [20, 5], [25, 5], [25, 0], [20, 0]],
                                       [[30, 0], [30, 5], [35, 5], [35, 0], [30, 0]]]}
            },
            {
                "attributes": {"OBJECTID": 19},
                "geometry": null
            }
        ]
    }"#;

    #[test]
    fn test_polygon_with_hole() {
        let fc = to_feature_collection(PARCELS.as_bytes(), "OBJECTID").unwrap();
        assert_eq!(fc.features.len(), 3);

        let first = &fc.features[0];
        assert_eq!(first.id, Some(Id::Number(17.into())));
        assert_eq!(
            first.property("PIN").and_then(|v| v.as_str()),
            Some("0412-33-001")
        );

        let geometry = Geometry::<f64>::try_from(first.geometry.clone().unwrap()).unwrap();
        let Geometry::Polygon(polygon) = geometry else {
            panic!("expected polygon");
        };
        assert_eq!(polygon.interiors().len(), 1);
    }

    #[test]
    fn test_two_shells_become_multipolygon() {
        let fc = to_feature_collection(PARCELS.as_bytes(), "OBJECTID").unwrap();
        let geometry = fc.features[1].geometry.as_ref().unwrap();
        assert!(matches!(geometry.value, Value::MultiPolygon(ref polys) if polys.len() == 2));
    }

    #[test]
    fn test_missing_geometry_is_null() {
        let fc = to_feature_collection(PARCELS.as_bytes(), "OBJECTID").unwrap();
        assert!(fc.features[2].geometry.is_none());
    }

    #[test]
    fn test_string_id_key() {
        let fc = to_feature_collection(PARCELS.as_bytes(), "PIN").unwrap();
        assert_eq!(fc.features[0].id, Some(Id::String("0412-33-001".to_string())));
        assert_eq!(fc.features[2].id, None);
    }

    #[test]
    fn test_points_and_paths() {
        let body = r#"{"features": [
            {"attributes": {}, "geometry": {"x": -77.03, "y": 38.89}},
            {"attributes": {}, "geometry": {"paths": [[[0, 0], [1, 1, 5.0]]]}},
            {"attributes": {}, "geometry": {"points": [[0, 0], [1, 1]]}}
        ]}"#;

        let fc = to_feature_collection(body.as_bytes(), "OBJECTID").unwrap();
        let kinds: Vec<&str> = fc
            .features
            .iter()
            .map(|f| match f.geometry.as_ref().unwrap().value {
                Value::Point(_) => "Point",
                Value::LineString(_) => "LineString",
                Value::MultiPoint(_) => "MultiPoint",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["Point", "LineString", "MultiPoint"]);
    }

    #[test]
    fn test_rejects_short_coordinate() {
        let body = r#"{"features": [{"attributes": {}, "geometry": {"paths": [[[0]]]}}]}"#;
        let err = to_feature_collection(body.as_bytes(), "OBJECTID").unwrap_err();
        assert!(matches!(err, ConversionError::InvalidCoordinate(_)));
    }

    #[test]
    fn test_rejects_non_feature_set() {
        assert!(to_feature_collection(b"{\"type\": \"FeatureCollection\"}", "OBJECTID").is_err());
        assert!(to_feature_collection(b"<html>", "OBJECTID").is_err());
    }
}
