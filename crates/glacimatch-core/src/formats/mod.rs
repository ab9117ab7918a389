//! Format abstraction for the glacier vector input.
//!
//! Each supported vector format implements [`VectorReader`]; the
//! [`FormatRegistry`] dispatches on the file extension. The station CSV
//! side lives in [`table`] and is not part of the registry — the table
//! contract (required coordinate columns) is different from a feature
//! collection.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{GlacimatchError, Result};

pub mod geojson;
pub mod shapefile;
pub mod table;

/// Reader for one vector file format
pub trait VectorReader {
    /// Read a feature dataset from the given path
    fn read(&self, path: &Path) -> Result<VectorDataset>;

    /// Supported file extensions (e.g. ["shp"])
    fn supported_extensions(&self) -> &[&str];

    /// Human-readable format name (e.g. "Shapefile")
    fn format_name(&self) -> &str;
}

/// Dataset representation returned by vector readers
#[derive(Debug, Clone)]
pub struct VectorDataset {
    /// Dataset name (file stem)
    pub name: String,

    /// Format it was read from
    pub format_name: String,

    /// CRS EPSG code (4326 when the file does not declare one)
    pub crs: u32,

    /// Features extracted from the file
    pub features: Vec<VectorFeature>,
}

/// Feature extracted from a vector file
#[derive(Debug, Clone)]
pub struct VectorFeature {
    pub id: String,

    /// Geometry as a GeoJSON-like structure, `None` for null shapes
    pub geometry: Option<serde_json::Value>,

    pub properties: HashMap<String, serde_json::Value>,
}

/// Registry of vector readers with extension-based dispatch
pub struct FormatRegistry {
    readers: Vec<Box<dyn VectorReader>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            readers: Vec::new(),
        }
    }

    /// Registry with every built-in reader
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(geojson::GeoJsonReader));
        registry.register(Box::new(shapefile::ShapefileVectorReader));
        registry
    }

    /// Register a vector reader
    pub fn register(&mut self, reader: Box<dyn VectorReader>) {
        self.readers.push(reader);
    }

    /// Detect the format of a path and return the matching reader
    pub fn detect_format(&self, path: &Path) -> Result<&dyn VectorReader> {
        let extension = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            GlacimatchError::UnsupportedFormat {
                extension: "none".to_string(),
                supported: self.supported_formats(),
            }
        })?;

        self.readers
            .iter()
            .find(|r| {
                r.supported_extensions()
                    .iter()
                    .any(|e| e.eq_ignore_ascii_case(extension))
            })
            .map(|r| r.as_ref())
            .ok_or_else(|| GlacimatchError::UnsupportedFormat {
                extension: extension.to_string(),
                supported: self.supported_formats(),
            })
    }

    /// All supported extensions
    pub fn supported_formats(&self) -> Vec<String> {
        self.readers
            .iter()
            .flat_map(|r| r.supported_extensions())
            .map(|s| s.to_string())
            .collect()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
