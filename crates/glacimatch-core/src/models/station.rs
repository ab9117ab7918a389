//! Station table models.
//!
//! A station row keeps every original column untouched next to the
//! parsed coordinate pair, so the exporter can reproduce the input
//! columns verbatim.

use std::path::PathBuf;

use crate::models::Geometry;

/// One weather station row
#[derive(Debug, Clone)]
pub struct StationRecord {
    /// All original column values, in header order
    pub fields: Vec<String>,
    /// Longitude in decimal degrees (WGS 84)
    pub longitude: f64,
    /// Latitude in decimal degrees (WGS 84)
    pub latitude: f64,
}

impl StationRecord {
    /// The station as a geographic point geometry
    pub fn point(&self) -> Geometry {
        Geometry::point(self.longitude, self.latitude)
    }
}

/// An in-memory station table with its header row
#[derive(Debug, Clone)]
pub struct StationTable {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<StationRecord>,
}

impl StationTable {
    /// Index of a column by exact header name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
