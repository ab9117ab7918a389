//! Delimited station table I/O: the CSV reader for station rows and the
//! writer for the augmented match table.

use std::path::{Path, PathBuf};

use crate::error::{GlacimatchError, Result};
use crate::models::{MatchReport, StationRecord, StationTable};

pub const LATITUDE_COLUMN: &str = "latitude";
pub const LONGITUDE_COLUMN: &str = "longitude";

/// Name of the appended glacier-name column
pub const GLACIER_COLUMN: &str = "closest_glacier";
/// Name of the appended distance column
pub const DISTANCE_COLUMN: &str = "distance_to_glacier_km";

/// Read a station table.
///
/// Requires `latitude` and `longitude` columns; all other columns are
/// kept verbatim for the export.
pub fn read_stations(path: &Path) -> Result<StationTable> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();

    let lat_idx = column_index(&headers, LATITUDE_COLUMN, path)?;
    let lon_idx = column_index(&headers, LONGITUDE_COLUMN, path)?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let fields: Vec<String> = record.iter().map(|f| f.to_string()).collect();

        let latitude = parse_coordinate(&fields, lat_idx, LATITUDE_COLUMN, i)?;
        let longitude = parse_coordinate(&fields, lon_idx, LONGITUDE_COLUMN, i)?;

        rows.push(StationRecord {
            fields,
            longitude,
            latitude,
        });
    }

    Ok(StationTable {
        path: path.to_path_buf(),
        headers,
        rows,
    })
}

/// Write the match table: original columns plus the two match columns.
/// Unmatched rows get empty match fields.
pub fn write_matches(path: &Path, report: &MatchReport) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = report.headers.clone();
    header.push(GLACIER_COLUMN.to_string());
    header.push(DISTANCE_COLUMN.to_string());
    writer.write_record(&header)?;

    for row in &report.rows {
        let mut record = row.fields.clone();
        match &row.nearest {
            Some(nearest) => {
                record.push(nearest.name.clone());
                record.push(nearest.distance_km.to_string());
            }
            None => {
                record.push(String::new());
                record.push(String::new());
            }
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Header summary used by the inspect surface
#[derive(Debug, Clone)]
pub struct TableSummary {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub rows: usize,
    pub has_latitude: bool,
    pub has_longitude: bool,
}

/// Describe a delimited table without enforcing the station contract
pub fn describe_table(path: &Path) -> Result<TableSummary> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let rows = reader.records().filter_map(|r| r.ok()).count();

    Ok(TableSummary {
        path: path.to_path_buf(),
        has_latitude: headers.iter().any(|h| h == LATITUDE_COLUMN),
        has_longitude: headers.iter().any(|h| h == LONGITUDE_COLUMN),
        headers,
        rows,
    })
}

fn column_index(headers: &[String], name: &str, path: &Path) -> Result<usize> {
    headers.iter().position(|h| h == name).ok_or_else(|| {
        GlacimatchError::StationColumnMissing {
            column: name.to_string(),
            path: path.to_path_buf(),
        }
    })
}

fn parse_coordinate(fields: &[String], idx: usize, column: &str, row: usize) -> Result<f64> {
    let raw = fields.get(idx).map(String::as_str).unwrap_or("");
    // row is reported 1-based, counting the header line
    raw.trim()
        .parse::<f64>()
        .map_err(|_| GlacimatchError::InvalidCoordinate {
            row: row + 2,
            column: column.to_string(),
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchedStation, NearestGlacier};
    use std::fs;

    fn write_csv(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stations.csv");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_read_stations() {
        let (_dir, path) = write_csv("id,name,latitude,longitude\n1,Finse,60.6,7.5\n2,Fokstugu,62.1,9.3\n");

        let table = read_stations(&path).unwrap();

        assert_eq!(table.headers, vec!["id", "name", "latitude", "longitude"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].latitude, 60.6);
        assert_eq!(table.rows[0].longitude, 7.5);
        assert_eq!(table.rows[1].fields[1], "Fokstugu");
    }

    #[test]
    fn test_missing_column() {
        let (_dir, path) = write_csv("id,lat,lon\n1,60.6,7.5\n");

        let result = read_stations(&path);
        assert!(matches!(
            result,
            Err(GlacimatchError::StationColumnMissing { column, .. }) if column == "latitude"
        ));
    }

    #[test]
    fn test_malformed_coordinate() {
        let (_dir, path) = write_csv("id,latitude,longitude\n1,sixty,7.5\n");

        let result = read_stations(&path);
        assert!(matches!(
            result,
            Err(GlacimatchError::InvalidCoordinate { row, column, value })
                if row == 2 && column == "latitude" && value == "sixty"
        ));
    }

    #[test]
    fn test_write_matches_appends_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let report = MatchReport {
            headers: vec!["id".to_string(), "name".to_string()],
            rows: vec![
                MatchedStation {
                    fields: vec!["1".to_string(), "Finse".to_string()],
                    nearest: Some(NearestGlacier::new("Hardangerjøkulen".to_string(), 5400.0)),
                },
                MatchedStation {
                    fields: vec!["2".to_string(), "Fokstugu".to_string()],
                    nearest: None,
                },
            ],
        };

        write_matches(&path, &report).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next(),
            Some("id,name,closest_glacier,distance_to_glacier_km")
        );
        assert_eq!(lines.next(), Some("1,Finse,Hardangerjøkulen,5.4"));
        assert_eq!(lines.next(), Some("2,Fokstugu,,"));
    }

    #[test]
    fn test_describe_table() {
        let (_dir, path) = write_csv("id,latitude,longitude\n1,60.6,7.5\n2,62.1,9.3\n");

        let summary = describe_table(&path).unwrap();
        assert_eq!(summary.rows, 2);
        assert!(summary.has_latitude);
        assert!(summary.has_longitude);
    }
}
