//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::coord::ZOOM_LIMIT;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [service] section
    if let Some(section) = ini.section(Some("service")) {
        if let Some(v) = section.get("url") {
            let v = v.trim();
            if !v.is_empty() {
                config.service.url = Some(v.to_string());
            }
        }
        if let Some(v) = section.get("agent") {
            let v = v.trim();
            if !v.is_empty() {
                config.service.agent = v.to_string();
            }
        }
        if let Some(v) = section.get("format") {
            config.service.format = v.parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "service".to_string(),
                key: "format".to_string(),
                value: v.to_string(),
                reason: "must be 'geojson' or 'json'".to_string(),
            })?;
        }
        if let Some(v) = section.get("spatial_reference") {
            let v = v.trim();
            if v.is_empty() || !v.chars().all(|c| c.is_ascii_digit()) {
                return Err(ConfigFileError::InvalidValue {
                    section: "service".to_string(),
                    key: "spatial_reference".to_string(),
                    value: v.to_string(),
                    reason: "must be a numeric WKID such as 4326".to_string(),
                });
            }
            config.service.spatial_reference = v.to_string();
        }
        if let Some(v) = section.get("id_key") {
            let v = v.trim();
            if !v.is_empty() {
                config.service.id_key = v.to_string();
            }
        }
    }

    // [fetch] section
    if let Some(section) = ini.section(Some("fetch")) {
        if let Some(v) = section.get("zoom") {
            config.fetch.zoom = v
                .trim()
                .parse()
                .ok()
                .filter(|z| *z <= ZOOM_LIMIT)
                .ok_or_else(|| ConfigFileError::InvalidValue {
                    section: "fetch".to_string(),
                    key: "zoom".to_string(),
                    value: v.to_string(),
                    reason: format!("must be an integer between 0 and {}", ZOOM_LIMIT),
                })?;
        }
        if let Some(v) = section.get("limit") {
            config.fetch.limit = v
                .trim()
                .parse()
                .ok()
                .filter(|l| *l > 0)
                .ok_or_else(|| ConfigFileError::InvalidValue {
                    section: "fetch".to_string(),
                    key: "limit".to_string(),
                    value: v.to_string(),
                    reason: "must be a positive integer".to_string(),
                })?;
        }
        if let Some(v) = section.get("wait_ms") {
            config.fetch.wait_ms = v.trim().parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "fetch".to_string(),
                key: "wait_ms".to_string(),
                value: v.to_string(),
                reason: "must be a non-negative integer (milliseconds)".to_string(),
            })?;
        }
        if let Some(v) = section.get("update") {
            config.fetch.update = parse_bool(v).ok_or_else(|| ConfigFileError::InvalidValue {
                section: "fetch".to_string(),
                key: "update".to_string(),
                value: v.to_string(),
                reason: "must be true or false".to_string(),
            })?;
        }
    }

    // [output] section
    if let Some(section) = ini.section(Some("output")) {
        if let Some(v) = section.get("parcels_dir") {
            let v = v.trim();
            if !v.is_empty() {
                config.output.parcels_dir = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("tiles_dir") {
            let v = v.trim();
            if !v.is_empty() {
                config.output.tiles_dir = Some(expand_tilde(v));
            }
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = Some(expand_tilde(v));
            }
        }
    }

    Ok(config)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;
    use crate::query::ResponseFormat;
    use tempfile::TempDir;

    fn load(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, content).unwrap();
        ConfigFile::load_from(&config_path)
    }

    #[test]
    fn test_full_config() {
        let config = load(
            r#"
[service]
url = https://gis.example.gov/arcgis/rest/services/Parcels/FeatureServer/0
agent = county-mirror/1.0
format = JSON
spatial_reference = 3857
id_key = PARCELID

[fetch]
zoom = 15
limit = 2000
wait_ms = 1500
update = yes

[output]
parcels_dir = /data/parcels
tiles_dir = /data/tiles

[logging]
file = /var/log/parcelier.log
"#,
        )
        .unwrap();

        assert_eq!(
            config.service.url.as_deref(),
            Some("https://gis.example.gov/arcgis/rest/services/Parcels/FeatureServer/0")
        );
        assert_eq!(config.service.agent, "county-mirror/1.0");
        assert_eq!(config.service.format, ResponseFormat::Json);
        assert_eq!(config.service.spatial_reference, "3857");
        assert_eq!(config.service.id_key, "PARCELID");
        assert_eq!(config.fetch.zoom, 15);
        assert_eq!(config.fetch.limit, 2000);
        assert_eq!(config.fetch.wait_ms, 1500);
        assert!(config.fetch.update);
        assert_eq!(config.output.parcels_dir, PathBuf::from("/data/parcels"));
        assert_eq!(config.output.tiles_dir, Some(PathBuf::from("/data/tiles")));
        assert_eq!(
            config.logging.file,
            Some(PathBuf::from("/var/log/parcelier.log"))
        );
    }

    #[test]
    fn test_partial_config() {
        let config = load(
            r#"
[fetch]
limit = 250
"#,
        )
        .unwrap();

        assert_eq!(config.fetch.limit, 250);
        assert_eq!(config.fetch.zoom, DEFAULT_ZOOM);
        assert_eq!(config.service.agent, DEFAULT_AGENT);
        assert_eq!(config.fetch.wait_ms, DEFAULT_WAIT_MS);
    }

    #[test]
    fn test_invalid_format() {
        let err = load("[service]\nformat = pbf\n").unwrap_err();
        match err {
            ConfigFileError::InvalidValue { section, key, .. } => {
                assert_eq!(section, "service");
                assert_eq!(key, "format");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_zoom_above_ceiling_rejected() {
        let err = load("[fetch]\nzoom = 26\n").unwrap_err();
        assert!(err.to_string().contains("fetch.zoom"));
        assert!(load("[fetch]\nzoom = 25\n").is_ok());
    }

    #[test]
    fn test_zero_limit_rejected() {
        assert!(load("[fetch]\nlimit = 0\n").is_err());
        assert!(load("[fetch]\nlimit = many\n").is_err());
    }

    #[test]
    fn test_invalid_update_flag() {
        assert!(load("[fetch]\nupdate = maybe\n").is_err());
        assert!(!load("[fetch]\nupdate = off\n").unwrap().fetch.update);
    }

    #[test]
    fn test_non_numeric_spatial_reference() {
        assert!(load("[service]\nspatial_reference = EPSG:4326\n").is_err());
    }

    #[test]
    fn test_empty_values_keep_defaults() {
        let config = load("[service]\nurl =\nagent =\n[output]\ntiles_dir =\n").unwrap();
        assert!(config.service.url.is_none());
        assert_eq!(config.service.agent, DEFAULT_AGENT);
        assert!(config.output.tiles_dir.is_none());
    }

    #[test]
    fn test_expand_tilde() {
        let path = expand_tilde("~/parcels");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path, home.join("parcels"));
        }

        let path = expand_tilde("/absolute/path");
        assert_eq!(path, PathBuf::from("/absolute/path"));
    }
}
