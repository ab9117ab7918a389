//! Match command implementation

use crate::cli::MatchArgs;
use crate::config::ConfigFile;
use crate::output::OutputWriter;
use crate::output_types::{MatchOutput, PreviewRow};
use anyhow::{Context, Result};
use glacimatch_core::config::{ConfigSource, MatchOptions};
use glacimatch_core::models::{Crs, MatchReport};
use glacimatch_core::processing::{run_match, MatchParams};
use std::path::Path;
use tabled::Tabled;
use tracing::debug;

pub fn execute(args: MatchArgs, config_path: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let options = resolve_options(&args, config_path)?;
    debug!(
        name_field = %options.name_field.value,
        epsg = options.target_epsg.value,
        source = ?options.name_field.source,
        "resolved match options"
    );

    let params = MatchParams {
        stations: args.stations.clone(),
        glaciers: args.glaciers.clone(),
        output: args.output.clone(),
        name_field: options.name_field.value.clone(),
        target_crs: Crs::from_epsg(options.target_epsg.value),
        max_distance_km: options.max_distance_km.value,
    };

    let (report, summary) = run_match(&params).context("Match run failed")?;

    let preview = preview_rows(&report, options.preview_rows.value);

    if output.is_json() {
        output.result(MatchOutput {
            output: summary.output.display().to_string(),
            stations: summary.stations,
            glaciers: summary.glaciers,
            matched: summary.matched,
            preview,
        })?;
    } else {
        output.success(format!("Exported {}", summary.output.display()));
        output.kv("Stations", summary.stations);
        output.kv("Glacier features", summary.glaciers);
        output.kv("Matched", summary.matched);
        if summary.matched < summary.stations {
            output.info(format!(
                "{} station(s) without a glacier match",
                summary.stations - summary.matched
            ));
        }

        if !preview.is_empty() {
            output.section("Preview");

            #[derive(Tabled)]
            struct MatchRow {
                #[tabled(rename = "ID")]
                id: String,
                #[tabled(rename = "Name")]
                name: String,
                #[tabled(rename = "Closest glacier")]
                closest_glacier: String,
                #[tabled(rename = "Distance (km)")]
                distance_km: String,
            }

            let rows: Vec<MatchRow> = preview
                .iter()
                .map(|row| MatchRow {
                    id: row.id.clone(),
                    name: row.name.clone(),
                    closest_glacier: row.closest_glacier.clone(),
                    distance_km: row
                        .distance_to_glacier_km
                        .map(|km| format!("{km:.3}"))
                        .unwrap_or_default(),
                })
                .collect();

            output.table(rows);
        }
    }

    Ok(())
}

/// CLI arguments > config file > defaults
fn resolve_options(args: &MatchArgs, config_path: Option<&Path>) -> Result<MatchOptions> {
    let mut options = MatchOptions::with_defaults();

    if let Some(config) = ConfigFile::discover(config_path)? {
        config.apply(&mut options);
    }

    if let Some(v) = &args.name_field {
        options.name_field.update(v.clone(), ConfigSource::Cli);
    }
    if let Some(v) = args.epsg {
        options.target_epsg.update(v, ConfigSource::Cli);
    }
    if let Some(v) = args.preview {
        options.preview_rows.update(v, ConfigSource::Cli);
    }
    if let Some(v) = args.max_distance_km {
        options.max_distance_km.update(Some(v), ConfigSource::Cli);
    }

    Ok(options)
}

/// First rows of the report as preview entries. The id and name columns
/// are looked up by header and left blank when the table has neither.
fn preview_rows(report: &MatchReport, limit: usize) -> Vec<PreviewRow> {
    let id_idx = report.column_index("id");
    let name_idx = report.column_index("name");

    report
        .rows
        .iter()
        .take(limit)
        .map(|row| PreviewRow {
            id: id_idx
                .and_then(|i| row.fields.get(i))
                .cloned()
                .unwrap_or_default(),
            name: name_idx
                .and_then(|i| row.fields.get(i))
                .cloned()
                .unwrap_or_default(),
            closest_glacier: row
                .nearest
                .as_ref()
                .map(|n| n.name.clone())
                .unwrap_or_default(),
            distance_to_glacier_km: row.nearest.as_ref().map(|n| n.distance_km),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glacimatch_core::models::{MatchedStation, NearestGlacier};

    #[test]
    fn test_preview_uses_id_and_name_columns() {
        let report = MatchReport {
            headers: vec![
                "id".to_string(),
                "name".to_string(),
                "latitude".to_string(),
                "longitude".to_string(),
            ],
            rows: vec![MatchedStation {
                fields: vec![
                    "7".to_string(),
                    "Finse".to_string(),
                    "60.6".to_string(),
                    "7.5".to_string(),
                ],
                nearest: Some(NearestGlacier::new("Hardangerjøkulen".to_string(), 5400.0)),
            }],
        };

        let preview = preview_rows(&report, 5);
        assert_eq!(preview.len(), 1);
        assert_eq!(preview[0].id, "7");
        assert_eq!(preview[0].name, "Finse");
        assert_eq!(preview[0].closest_glacier, "Hardangerjøkulen");
        assert_eq!(preview[0].distance_to_glacier_km, Some(5.4));
    }

    #[test]
    fn test_preview_blank_when_columns_absent() {
        let report = MatchReport {
            headers: vec!["latitude".to_string(), "longitude".to_string()],
            rows: vec![MatchedStation {
                fields: vec!["60.6".to_string(), "7.5".to_string()],
                nearest: None,
            }],
        };

        let preview = preview_rows(&report, 5);
        assert_eq!(preview[0].id, "");
        assert_eq!(preview[0].name, "");
        assert_eq!(preview[0].closest_glacier, "");
        assert!(preview[0].distance_to_glacier_km.is_none());
    }

    #[test]
    fn test_preview_respects_limit() {
        let rows = (0..10)
            .map(|i| MatchedStation {
                fields: vec![i.to_string()],
                nearest: None,
            })
            .collect();
        let report = MatchReport {
            headers: vec!["id".to_string()],
            rows,
        };

        assert_eq!(preview_rows(&report, 3).len(), 3);
    }
}
