//! GeoJSON vector reader

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{GlacimatchError, Result};
use crate::formats::{VectorDataset, VectorFeature, VectorReader};

/// GeoJSON format reader
pub struct GeoJsonReader;

impl VectorReader for GeoJsonReader {
    fn read(&self, path: &Path) -> Result<VectorDataset> {
        let content = fs::read_to_string(path).map_err(GlacimatchError::Io)?;

        let geojson: geojson::GeoJson =
            content
                .parse()
                .map_err(|e| GlacimatchError::FormatError {
                    format: "GeoJSON".to_string(),
                    message: format!("Failed to parse {}: {}", path.display(), e),
                })?;

        let (features, crs) = extract_features_and_crs(&geojson)?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unnamed")
            .to_string();

        Ok(VectorDataset {
            name,
            format_name: "GeoJSON".to_string(),
            crs,
            features,
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json", "geojson"]
    }

    fn format_name(&self) -> &str {
        "GeoJSON"
    }
}

/// Extract features and the declared CRS (default WGS 84)
fn extract_features_and_crs(geojson: &geojson::GeoJson) -> Result<(Vec<VectorFeature>, u32)> {
    match geojson {
        geojson::GeoJson::FeatureCollection(fc) => {
            let features = fc
                .features
                .iter()
                .enumerate()
                .map(|(idx, feature)| convert_feature(feature, idx))
                .collect();

            // The crs member is a legacy extension, but glacier
            // inventories still carry it.
            let crs = fc
                .foreign_members
                .as_ref()
                .and_then(|fm| fm.get("crs"))
                .and_then(extract_epsg_from_crs)
                .unwrap_or(4326);

            Ok((features, crs))
        }
        geojson::GeoJson::Feature(feature) => {
            let features = vec![convert_feature(feature, 0)];
            Ok((features, 4326))
        }
        geojson::GeoJson::Geometry(geom) => {
            let geometry_json =
                serde_json::to_value(geom).map_err(|e| GlacimatchError::FormatError {
                    format: "GeoJSON".to_string(),
                    message: format!("Failed to serialize geometry: {e}"),
                })?;

            let feature = VectorFeature {
                id: "0".to_string(),
                geometry: Some(geometry_json),
                properties: HashMap::new(),
            };

            Ok((vec![feature], 4326))
        }
    }
}

/// Convert a GeoJSON feature to a VectorFeature
fn convert_feature(feature: &geojson::Feature, idx: usize) -> VectorFeature {
    let id = feature
        .id
        .as_ref()
        .map(|id| match id {
            geojson::feature::Id::String(s) => s.clone(),
            geojson::feature::Id::Number(n) => n.to_string(),
        })
        .unwrap_or_else(|| idx.to_string());

    let geometry = feature
        .geometry
        .as_ref()
        .and_then(|geom| serde_json::to_value(geom).ok());

    let properties = feature
        .properties
        .as_ref()
        .map(|props| props.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default();

    VectorFeature {
        id,
        geometry,
        properties,
    }
}

/// Extract an EPSG code from a legacy CRS object
fn extract_epsg_from_crs(crs: &serde_json::Value) -> Option<u32> {
    // Accepts "EPSG:4326" and "urn:ogc:def:crs:EPSG::4326"
    let name = crs.get("properties")?.get("name")?.as_str()?;
    name.split(':').next_back()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_feature_collection() {
        let reader = GeoJsonReader;

        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("glaciers.geojson");

        let geojson_content = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "id": "glacier1",
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[8.0, 61.0], [8.1, 61.0], [8.1, 61.1], [8.0, 61.0]]]
                    },
                    "properties": {
                        "glac_names": "Jostedalsbreen"
                    }
                }
            ]
        }"#;

        fs::write(&file_path, geojson_content).unwrap();

        let result = reader.read(&file_path).unwrap();

        assert_eq!(result.name, "glaciers");
        assert_eq!(result.format_name, "GeoJSON");
        assert_eq!(result.crs, 4326);
        assert_eq!(result.features.len(), 1);
        assert_eq!(result.features[0].id, "glacier1");
        assert_eq!(
            result.features[0].properties.get("glac_names"),
            Some(&serde_json::json!("Jostedalsbreen"))
        );
    }

    #[test]
    fn test_crs_member_is_honored() {
        let reader = GeoJsonReader;

        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("projected.geojson");

        let geojson_content = r#"{
            "type": "FeatureCollection",
            "crs": {
                "type": "name",
                "properties": { "name": "urn:ogc:def:crs:EPSG::32633" }
            },
            "features": []
        }"#;

        fs::write(&file_path, geojson_content).unwrap();

        let result = reader.read(&file_path).unwrap();
        assert_eq!(result.crs, 32633);
    }

    #[test]
    fn test_single_feature_document() {
        let reader = GeoJsonReader;

        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("one.geojson");

        let geojson_content = r#"{
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [8.0, 61.0] },
            "properties": { "name": "lone feature" }
        }"#;

        fs::write(&file_path, geojson_content).unwrap();

        let result = reader.read(&file_path).unwrap();
        assert_eq!(result.features.len(), 1);
        assert!(result.features[0].geometry.is_some());
    }

    #[test]
    fn test_invalid_json_is_a_format_error() {
        let reader = GeoJsonReader;

        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("broken.geojson");
        fs::write(&file_path, "not valid json").unwrap();

        let result = reader.read(&file_path);
        assert!(matches!(
            result,
            Err(crate::error::GlacimatchError::FormatError { format, .. }) if format == "GeoJSON"
        ));
    }

    #[test]
    fn test_epsg_extraction_variants() {
        let plain = serde_json::json!({ "properties": { "name": "EPSG:4326" } });
        assert_eq!(extract_epsg_from_crs(&plain), Some(4326));

        let urn = serde_json::json!({ "properties": { "name": "urn:ogc:def:crs:EPSG::3857" } });
        assert_eq!(extract_epsg_from_crs(&urn), Some(3857));

        let nonsense = serde_json::json!({ "properties": { "name": "not-a-crs" } });
        assert_eq!(extract_epsg_from_crs(&nonsense), None);
    }
}
