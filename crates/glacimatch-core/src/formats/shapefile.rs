//! ESRI Shapefile vector reader
//!
//! Shapefiles consist of multiple component files (.shp, .shx, .dbf,
//! .prj) that must all be present for proper reading. Attributes come
//! from the dBase table; the CRS is taken from the .prj WKT when one is
//! shipped alongside.

use std::collections::HashMap;
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use shapefile::dbase::FieldValue as DbaseFieldValue;
use shapefile::{PolygonRing, Reader as ShapefileReader, Shape};
use tracing::warn;

use crate::error::{GlacimatchError, Result};
use crate::formats::{VectorDataset, VectorFeature, VectorReader};

/// Shapefile format reader
pub struct ShapefileVectorReader;

impl VectorReader for ShapefileVectorReader {
    fn read(&self, path: &Path) -> Result<VectorDataset> {
        self.verify_components(path)?;

        let mut reader =
            ShapefileReader::from_path(path).map_err(|e| GlacimatchError::FormatError {
                format: "Shapefile".to_string(),
                message: format!("Failed to open Shapefile: {e}"),
            })?;

        let crs = self.extract_crs(path)?;
        let features = self.read_features(&mut reader)?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unnamed")
            .to_string();

        Ok(VectorDataset {
            name,
            format_name: "Shapefile".to_string(),
            crs,
            features,
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["shp"]
    }

    fn format_name(&self) -> &str {
        "Shapefile"
    }
}

impl ShapefileVectorReader {
    /// Base path of the Shapefile (without extension)
    fn shapefile_base(&self, path: &Path) -> Result<PathBuf> {
        let is_shp = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("shp"))
            .unwrap_or(false);
        if !is_shp {
            return Err(GlacimatchError::InvalidPath {
                path: path.to_path_buf(),
                reason: "Not a Shapefile (.shp)".to_string(),
            });
        }

        Ok(path.with_extension(""))
    }

    /// Verify that all required component files exist
    fn verify_components(&self, path: &Path) -> Result<()> {
        let base = self.shapefile_base(path)?;
        let mut missing = Vec::new();

        for ext in ["shp", "shx", "dbf"] {
            if !base.with_extension(ext).exists() {
                missing.push(format!(".{ext}"));
            }
        }

        if !missing.is_empty() {
            return Err(GlacimatchError::FormatError {
                format: "Shapefile".to_string(),
                message: format!("Missing required component files: {}", missing.join(", ")),
            });
        }

        Ok(())
    }

    /// CRS from the .prj file, defaulting to EPSG:4326 when absent or
    /// when no EPSG authority can be extracted from the WKT.
    fn extract_crs(&self, path: &Path) -> Result<u32> {
        let base = self.shapefile_base(path)?;
        let prj_path = base.with_extension("prj");

        if !prj_path.exists() {
            return Ok(4326);
        }

        let prj_content =
            fs::read_to_string(&prj_path).map_err(|e| GlacimatchError::FormatError {
                format: "Shapefile".to_string(),
                message: format!("Failed to read .prj file: {e}"),
            })?;

        Ok(parse_epsg_from_wkt(&prj_content).unwrap_or(4326))
    }

    /// Read all features from the Shapefile
    fn read_features(
        &self,
        reader: &mut shapefile::Reader<BufReader<fs::File>, BufReader<fs::File>>,
    ) -> Result<Vec<VectorFeature>> {
        let mut features = Vec::new();

        for result in reader.iter_shapes_and_records() {
            let (shape, record) = result.map_err(|e| GlacimatchError::FormatError {
                format: "Shapefile".to_string(),
                message: format!("Failed to read feature: {e}"),
            })?;

            let id = features.len().to_string();
            let geometry = match shape_to_geojson(&shape) {
                Some(geometry) => Some(geometry),
                None => {
                    warn!(feature = %id, "shape type not representable, feature kept without geometry");
                    None
                }
            };

            let properties = extract_properties(&record);

            features.push(VectorFeature {
                id,
                geometry,
                properties,
            });
        }

        Ok(features)
    }
}

/// Convert a shape to a GeoJSON value; `None` for null shapes and shape
/// classes outside this tool's model.
fn shape_to_geojson(shape: &Shape) -> Option<serde_json::Value> {
    match shape {
        Shape::Point(point) => Some(serde_json::json!({
            "type": "Point",
            "coordinates": [point.x, point.y]
        })),
        Shape::PointZ(point) => Some(serde_json::json!({
            "type": "Point",
            "coordinates": [point.x, point.y]
        })),
        Shape::PointM(point) => Some(serde_json::json!({
            "type": "Point",
            "coordinates": [point.x, point.y]
        })),
        Shape::Polygon(polygon) => {
            let rings = polygon
                .rings()
                .iter()
                .map(|ring| {
                    (
                        matches!(ring, PolygonRing::Outer(_)),
                        ring.points().iter().map(|p| [p.x, p.y]).collect(),
                    )
                })
                .collect();
            Some(areal_geometry(rings))
        }
        Shape::PolygonZ(polygon) => {
            let rings = polygon
                .rings()
                .iter()
                .map(|ring| {
                    (
                        matches!(ring, PolygonRing::Outer(_)),
                        ring.points().iter().map(|p| [p.x, p.y]).collect(),
                    )
                })
                .collect();
            Some(areal_geometry(rings))
        }
        Shape::PolygonM(polygon) => {
            let rings = polygon
                .rings()
                .iter()
                .map(|ring| {
                    (
                        matches!(ring, PolygonRing::Outer(_)),
                        ring.points().iter().map(|p| [p.x, p.y]).collect(),
                    )
                })
                .collect();
            Some(areal_geometry(rings))
        }
        _ => None,
    }
}

/// Group shapefile rings into GeoJSON polygon parts.
///
/// Shapefile polygons interleave outer and inner rings in one list; an
/// outer ring opens a new part and inner rings belong to the part opened
/// before them. One part becomes a Polygon, several a MultiPolygon.
fn areal_geometry(rings: Vec<(bool, Vec<[f64; 2]>)>) -> serde_json::Value {
    let mut parts: Vec<Vec<Vec<[f64; 2]>>> = Vec::new();

    for (is_outer, coords) in rings {
        if is_outer || parts.is_empty() {
            parts.push(vec![coords]);
        } else if let Some(part) = parts.last_mut() {
            part.push(coords);
        }
    }

    if parts.len() == 1 {
        serde_json::json!({
            "type": "Polygon",
            "coordinates": parts.remove(0)
        })
    } else {
        serde_json::json!({
            "type": "MultiPolygon",
            "coordinates": parts
        })
    }
}

/// Extract properties from the dBase record
fn extract_properties(record: &shapefile::dbase::Record) -> HashMap<String, serde_json::Value> {
    let mut properties = HashMap::new();

    for (name, value) in record.clone() {
        properties.insert(name, convert_dbase_value(&value));
    }

    properties
}

/// Convert a dBase field value to a JSON value
fn convert_dbase_value(value: &DbaseFieldValue) -> serde_json::Value {
    match value {
        DbaseFieldValue::Character(Some(s)) => serde_json::Value::String(s.clone()),
        DbaseFieldValue::Character(None) => serde_json::Value::Null,
        DbaseFieldValue::Numeric(Some(n)) => serde_json::Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        DbaseFieldValue::Numeric(None) => serde_json::Value::Null,
        DbaseFieldValue::Float(Some(f)) => serde_json::Number::from_f64(*f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        DbaseFieldValue::Float(None) => serde_json::Value::Null,
        DbaseFieldValue::Integer(i) => serde_json::Value::Number((*i).into()),
        DbaseFieldValue::Double(d) => serde_json::Number::from_f64(*d)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        DbaseFieldValue::Logical(Some(b)) => serde_json::Value::Bool(*b),
        DbaseFieldValue::Logical(None) => serde_json::Value::Null,
        DbaseFieldValue::Date(Some(date)) => serde_json::Value::String(format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            date.month(),
            date.day()
        )),
        DbaseFieldValue::Date(None) => serde_json::Value::Null,
        _ => serde_json::Value::Null,
    }
}

/// EPSG code from a .prj WKT string, scanning for the EPSG authority
fn parse_epsg_from_wkt(wkt: &str) -> Option<u32> {
    // AUTHORITY["EPSG","32633"] clauses; the last one names the full CRS
    if let Some(start) = wkt.rfind("AUTHORITY[\"EPSG\",\"") {
        let code_start = start + "AUTHORITY[\"EPSG\",\"".len();
        if let Some(end) = wkt[code_start..].find('"') {
            if let Ok(code) = wkt[code_start..code_start + end].parse::<u32>() {
                return Some(code);
            }
        }
    }

    // Bare EPSG:nnnn notation
    if let Some(start) = wkt.find("EPSG:") {
        let digits: String = wkt[start + 5..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if let Ok(code) = digits.parse::<u32>() {
            return Some(code);
        }
    }

    None
}
