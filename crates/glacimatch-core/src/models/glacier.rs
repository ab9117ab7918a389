//! Glacier feature collection built from a vector dataset.

use std::collections::HashMap;

use tracing::warn;

use crate::error::{GlacimatchError, Result};
use crate::formats::VectorDataset;
use crate::models::{Crs, Geometry};

/// A single glacier feature
#[derive(Debug, Clone)]
pub struct Glacier {
    pub id: String,
    /// Raw value of the name attribute, when the feature carries one
    pub name: Option<String>,
    /// GLIMS inventory identifier, used as a display fallback
    pub glims_id: Option<String>,
    pub geometry: Geometry,
}

impl Glacier {
    /// Display label: the name attribute, else `GLIMS <id>`, else empty.
    pub fn label(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        if let Some(glims) = &self.glims_id {
            return format!("GLIMS {glims}");
        }
        String::new()
    }
}

/// Glacier features with the attribute schema they were loaded under
#[derive(Debug, Clone)]
pub struct GlacierCollection {
    pub name_field: String,
    pub crs: Crs,
    pub glaciers: Vec<Glacier>,
}

impl GlacierCollection {
    /// Build a collection from a parsed vector dataset.
    ///
    /// Fails when no feature carries the name attribute; this check runs
    /// before any spatial computation. Non-areal features are skipped.
    pub fn from_dataset(dataset: VectorDataset, name_field: &str) -> Result<Self> {
        let has_name_attribute = dataset
            .features
            .iter()
            .any(|f| f.properties.contains_key(name_field));
        if !dataset.features.is_empty() && !has_name_attribute {
            return Err(GlacimatchError::AttributeMissing {
                attribute: name_field.to_string(),
                dataset: dataset.name.clone(),
            });
        }

        let mut glaciers = Vec::with_capacity(dataset.features.len());
        for feature in &dataset.features {
            let Some(raw_geometry) = &feature.geometry else {
                warn!(feature = %feature.id, "feature has no geometry, skipped");
                continue;
            };
            let Some(geometry) = Geometry::from_geojson(raw_geometry) else {
                warn!(feature = %feature.id, "unparseable geometry, skipped");
                continue;
            };
            if !geometry.is_areal() {
                warn!(
                    feature = %feature.id,
                    kind = ?geometry.geometry_type(),
                    "non-areal feature cannot join by centroid, skipped"
                );
                continue;
            }

            glaciers.push(Glacier {
                id: feature.id.clone(),
                name: string_property(&feature.properties, name_field),
                glims_id: string_property(&feature.properties, "glims_id"),
                geometry,
            });
        }

        Ok(Self {
            name_field: name_field.to_string(),
            crs: Crs::from_epsg(dataset.crs),
            glaciers,
        })
    }

    pub fn len(&self) -> usize {
        self.glaciers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glaciers.is_empty()
    }
}

/// A trimmed, non-empty string property, or `None`
fn string_property(
    properties: &HashMap<String, serde_json::Value>,
    key: &str,
) -> Option<String> {
    properties
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::VectorFeature;

    fn polygon_value() -> serde_json::Value {
        serde_json::json!({
            "type": "Polygon",
            "coordinates": [[[8.0, 61.0], [8.1, 61.0], [8.1, 61.1], [8.0, 61.1], [8.0, 61.0]]]
        })
    }

    fn feature(id: &str, properties: HashMap<String, serde_json::Value>) -> VectorFeature {
        VectorFeature {
            id: id.to_string(),
            geometry: Some(polygon_value()),
            properties,
        }
    }

    fn dataset(features: Vec<VectorFeature>) -> VectorDataset {
        VectorDataset {
            name: "glaciers".to_string(),
            format_name: "GeoJSON".to_string(),
            crs: 4326,
            features,
        }
    }

    #[test]
    fn test_missing_name_attribute_fails() {
        let mut properties = HashMap::new();
        properties.insert("area_km2".to_string(), serde_json::json!(12.5));

        let result = GlacierCollection::from_dataset(dataset(vec![feature("0", properties)]), "glac_names");
        assert!(matches!(
            result,
            Err(GlacimatchError::AttributeMissing { attribute, .. }) if attribute == "glac_names"
        ));
    }

    #[test]
    fn test_empty_dataset_is_not_an_error() {
        let collection = GlacierCollection::from_dataset(dataset(vec![]), "glac_names").unwrap();
        assert!(collection.is_empty());
    }

    #[test]
    fn test_label_falls_back_to_glims_id() {
        let named = Glacier {
            id: "0".to_string(),
            name: Some("Jostedalsbreen".to_string()),
            glims_id: Some("G007251E61636N".to_string()),
            geometry: Geometry::point(0.0, 0.0),
        };
        assert_eq!(named.label(), "Jostedalsbreen");

        let unnamed = Glacier {
            name: None,
            ..named.clone()
        };
        assert_eq!(unnamed.label(), "GLIMS G007251E61636N");

        let anonymous = Glacier {
            name: None,
            glims_id: None,
            ..named
        };
        assert_eq!(anonymous.label(), "");
    }

    #[test]
    fn test_non_areal_features_are_skipped() {
        let mut properties = HashMap::new();
        properties.insert(
            "glac_names".to_string(),
            serde_json::json!("Jostedalsbreen"),
        );

        let point_feature = VectorFeature {
            id: "1".to_string(),
            geometry: Some(serde_json::json!({
                "type": "Point",
                "coordinates": [8.0, 61.0]
            })),
            properties: properties.clone(),
        };

        let collection = GlacierCollection::from_dataset(
            dataset(vec![feature("0", properties), point_feature]),
            "glac_names",
        )
        .unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.glaciers[0].id, "0");
    }
}
