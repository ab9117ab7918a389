//! Match results: one row per station, input order preserved.

use serde::Serialize;

/// The nearest glacier found for a station
#[derive(Debug, Clone, Serialize)]
pub struct NearestGlacier {
    pub name: String,
    pub distance_m: f64,
    pub distance_km: f64,
}

impl NearestGlacier {
    /// Kilometers are derived from meters here, so the two fields can
    /// never disagree.
    pub fn new(name: String, distance_m: f64) -> Self {
        Self {
            name,
            distance_m,
            distance_km: distance_m / 1000.0,
        }
    }
}

/// A station row with its optional match
#[derive(Debug, Clone)]
pub struct MatchedStation {
    /// Original column values, untouched
    pub fields: Vec<String>,
    /// `None` when no glacier was available or within the search radius
    pub nearest: Option<NearestGlacier>,
}

/// The full match result, ready for export
#[derive(Debug, Clone)]
pub struct MatchReport {
    /// Original input headers (the export appends the two match columns)
    pub headers: Vec<String>,
    pub rows: Vec<MatchedStation>,
}

impl MatchReport {
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
