//! Inspect command implementation

use crate::cli::InspectArgs;
use crate::config::ConfigFile;
use crate::output::OutputWriter;
use crate::output_types::{AttributeSummary, StationFileOutput, VectorFileOutput};
use anyhow::{Context, Result};
use glacimatch_core::config::{ConfigSource, MatchOptions};
use glacimatch_core::formats::{table, FormatRegistry};
use std::collections::BTreeMap;
use std::path::Path;
use tabled::Tabled;

pub fn execute(args: InspectArgs, config_path: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let extension = args
        .path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    if extension == "csv" {
        inspect_stations(&args.path, output)
    } else {
        let name_field = resolve_name_field(&args, config_path)?;
        inspect_vector(&args.path, &name_field, output)
    }
}

fn resolve_name_field(args: &InspectArgs, config_path: Option<&Path>) -> Result<String> {
    let mut options = MatchOptions::with_defaults();
    if let Some(config) = ConfigFile::discover(config_path)? {
        config.apply(&mut options);
    }
    if let Some(v) = &args.name_field {
        options.name_field.update(v.clone(), ConfigSource::Cli);
    }
    Ok(options.name_field.value)
}

/// Report on a station table without enforcing the coordinate contract
fn inspect_stations(path: &Path, output: &OutputWriter) -> Result<()> {
    let summary = table::describe_table(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    if output.is_json() {
        output.result(StationFileOutput {
            path: path.display().to_string(),
            rows: summary.rows,
            columns: summary.headers.clone(),
            has_latitude: summary.has_latitude,
            has_longitude: summary.has_longitude,
        })?;
        return Ok(());
    }

    output.section("Station Table");
    output.kv("Path", path.display());
    output.kv("Rows", summary.rows);
    output.kv("Columns", summary.headers.join(", "));

    if !summary.has_latitude || !summary.has_longitude {
        output.warning(format!(
            "Missing required coordinate column(s): {}",
            [
                (!summary.has_latitude).then_some(table::LATITUDE_COLUMN),
                (!summary.has_longitude).then_some(table::LONGITUDE_COLUMN),
            ]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ")
        ));
    } else {
        output.success("Coordinate columns present");
    }

    Ok(())
}

/// Report on a glacier vector file
fn inspect_vector(path: &Path, name_field: &str, output: &OutputWriter) -> Result<()> {
    let registry = FormatRegistry::with_defaults();
    let reader = registry.detect_format(path)?;
    let dataset = reader.read(path)?;

    let mut geometry_types: BTreeMap<String, usize> = BTreeMap::new();
    let mut attribute_counts: BTreeMap<String, usize> = BTreeMap::new();

    for feature in &dataset.features {
        let kind = feature
            .geometry
            .as_ref()
            .and_then(|g| g.get("type"))
            .and_then(|t| t.as_str())
            .unwrap_or("(none)")
            .to_string();
        *geometry_types.entry(kind).or_insert(0) += 1;

        for key in feature.properties.keys() {
            *attribute_counts.entry(key.clone()).or_insert(0) += 1;
        }
    }

    let name_field_present = attribute_counts.contains_key(name_field);
    let attributes: Vec<AttributeSummary> = attribute_counts
        .iter()
        .map(|(name, features)| AttributeSummary {
            name: name.clone(),
            features: *features,
        })
        .collect();

    if output.is_json() {
        output.result(VectorFileOutput {
            path: path.display().to_string(),
            format: dataset.format_name.clone(),
            crs: dataset.crs,
            features: dataset.features.len(),
            geometry_types,
            attributes,
            name_field: name_field.to_string(),
            name_field_present,
        })?;
        return Ok(());
    }

    output.section("Glacier Vector File");
    output.kv("Path", path.display());
    output.kv("Format", &dataset.format_name);
    output.kv("CRS", format!("EPSG:{}", dataset.crs));
    output.kv("Features", dataset.features.len());

    if !geometry_types.is_empty() {
        output.section("Geometry Types");

        #[derive(Tabled)]
        struct GeometryRow {
            #[tabled(rename = "Type")]
            kind: String,
            #[tabled(rename = "Features")]
            features: usize,
        }

        let rows: Vec<GeometryRow> = geometry_types
            .into_iter()
            .map(|(kind, features)| GeometryRow { kind, features })
            .collect();
        output.table(rows);
    }

    if !attributes.is_empty() {
        output.section("Attributes");

        #[derive(Tabled)]
        struct AttributeRow {
            #[tabled(rename = "Attribute")]
            name: String,
            #[tabled(rename = "Features")]
            features: usize,
        }

        let rows: Vec<AttributeRow> = attributes
            .into_iter()
            .map(|a| AttributeRow {
                name: a.name,
                features: a.features,
            })
            .collect();
        output.table(rows);
    }

    if name_field_present {
        output.success(format!("Name attribute '{name_field}' present"));
    } else {
        output.warning(format!(
            "Name attribute '{name_field}' not found; a match run would fail"
        ));
    }

    Ok(())
}
