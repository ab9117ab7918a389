//! The station-to-glacier match pipeline.
//!
//! One linear pass: load stations, load and validate the glacier
//! collection, derive centroids, reproject everything into the target
//! CRS, answer one nearest-neighbor query per station, and write the
//! augmented table. Fail-fast: the first error aborts the run before
//! any output is written.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::Result;
use crate::formats::{table, FormatRegistry};
use crate::geo::{validate_geometry, GlacierCentroid, NearestGlacierIndex, Reprojector};
use crate::models::{Crs, GlacierCollection, MatchReport, MatchedStation, NearestGlacier};

/// Inputs of a match run
#[derive(Debug, Clone)]
pub struct MatchParams {
    /// Station table (CSV with latitude/longitude columns)
    pub stations: PathBuf,
    /// Glacier vector file (GeoJSON or Shapefile)
    pub glaciers: PathBuf,
    /// Output CSV path
    pub output: PathBuf,
    /// Attribute holding the glacier name
    pub name_field: String,
    /// Projected CRS used for distance computation
    pub target_crs: Crs,
    /// Matches farther than this are discarded
    pub max_distance_km: Option<f64>,
}

/// Counters describing a finished run
#[derive(Debug, Clone)]
pub struct MatchSummary {
    pub stations: usize,
    pub glaciers: usize,
    pub matched: usize,
    pub output: PathBuf,
}

/// Run the whole pipeline and write the output table.
///
/// Returns the in-memory report (for previewing) next to the summary.
pub fn run_match(params: &MatchParams) -> Result<(MatchReport, MatchSummary)> {
    let stations = table::read_stations(&params.stations)?;
    info!(
        count = stations.len(),
        path = %params.stations.display(),
        "loaded station table"
    );

    let registry = FormatRegistry::with_defaults();
    let reader = registry.detect_format(&params.glaciers)?;
    let dataset = reader.read(&params.glaciers)?;
    info!(
        count = dataset.features.len(),
        format = %dataset.format_name,
        crs = dataset.crs,
        "loaded glacier features"
    );

    let glaciers = GlacierCollection::from_dataset(dataset, &params.name_field)?;

    // Centroids are taken in the source coordinates; only the centroid
    // point goes through the projection.
    let glacier_proj = Reprojector::new(&glaciers.crs, &params.target_crs)?;
    let mut centroids = Vec::with_capacity(glaciers.len());
    for (i, glacier) in glaciers.glaciers.iter().enumerate() {
        let check = validate_geometry(&glacier.geometry);
        if !check.is_valid {
            warn!(
                glacier = %glacier.label(),
                reason = %check.errors[0].reason,
                "glacier geometry failed validation"
            );
        }

        let Some(centroid) = glacier.geometry.centroid_coords() else {
            warn!(glacier = %glacier.label(), "no centroid could be derived, feature excluded");
            continue;
        };
        let (x, y) = glacier_proj.project_point(centroid[0], centroid[1])?;
        centroids.push(GlacierCentroid {
            glacier: i,
            position: [x, y],
        });
    }

    let index = NearestGlacierIndex::build(centroids);
    if index.is_empty() {
        warn!("no glacier centroids available, match fields will be empty");
    }

    // Station coordinates are degrees by the table contract
    let station_proj = Reprojector::new(&Crs::wgs84(), &params.target_crs)?;
    let max_distance_m = params.max_distance_km.map(|km| km * 1000.0);

    let mut rows = Vec::with_capacity(stations.len());
    let mut matched = 0usize;
    for station in &stations.rows {
        let (x, y) = station_proj.project_point(station.longitude, station.latitude)?;

        let found = match max_distance_m {
            Some(limit) => index.nearest_within([x, y], limit),
            None => index.nearest([x, y]),
        };

        let nearest = found.map(|(idx, meters)| {
            NearestGlacier::new(glaciers.glaciers[idx].label(), meters)
        });
        if nearest.is_some() {
            matched += 1;
        }

        rows.push(MatchedStation {
            fields: station.fields.clone(),
            nearest,
        });
    }

    let report = MatchReport {
        headers: stations.headers.clone(),
        rows,
    };

    table::write_matches(&params.output, &report)?;
    info!(
        rows = report.len(),
        path = %params.output.display(),
        "wrote match table"
    );

    let summary = MatchSummary {
        stations: report.len(),
        glaciers: glaciers.len(),
        matched,
        output: params.output.clone(),
    };

    Ok((report, summary))
}
