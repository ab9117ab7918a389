//! Structured payloads for --json output

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
pub struct PreviewRow {
    pub id: String,
    pub name: String,
    pub closest_glacier: String,
    pub distance_to_glacier_km: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct MatchOutput {
    pub output: String,
    pub stations: usize,
    pub glaciers: usize,
    pub matched: usize,
    pub preview: Vec<PreviewRow>,
}

#[derive(Debug, Serialize)]
pub struct StationFileOutput {
    pub path: String,
    pub rows: usize,
    pub columns: Vec<String>,
    pub has_latitude: bool,
    pub has_longitude: bool,
}

#[derive(Debug, Serialize)]
pub struct AttributeSummary {
    pub name: String,
    pub features: usize,
}

#[derive(Debug, Serialize)]
pub struct VectorFileOutput {
    pub path: String,
    pub format: String,
    pub crs: u32,
    pub features: usize,
    pub geometry_types: BTreeMap<String, usize>,
    pub attributes: Vec<AttributeSummary>,
    pub name_field: String,
    pub name_field_present: bool,
}
