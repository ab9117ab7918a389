//! Geometry validation for the shapes the pipeline ingests.
//!
//! Degenerate polygons are reported, not repaired; centroid computation
//! proceeds on whatever the source file contained.

use crate::models::Geometry;

/// Validation result with details
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Validation error with location details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub location: String,
    pub reason: String,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, location: String, reason: String) {
        self.is_valid = false;
        self.errors.push(ValidationError { location, reason });
    }
}

/// Validate a geometry
pub fn validate_geometry(geometry: &Geometry) -> ValidationResult {
    let mut result = ValidationResult::valid();
    match geometry {
        Geometry::Point { coordinates } => {
            if !coordinates[0].is_finite() || !coordinates[1].is_finite() {
                result.add_error(
                    format!("Point({}, {})", coordinates[0], coordinates[1]),
                    "Coordinates must be finite".to_string(),
                );
            }
        }
        Geometry::Polygon { coordinates } => {
            validate_rings(coordinates, "Polygon", &mut result);
        }
        Geometry::MultiPolygon { coordinates } => {
            for (i, polygon) in coordinates.iter().enumerate() {
                validate_rings(polygon, &format!("MultiPolygon[{i}]"), &mut result);
            }
        }
    }
    result
}

fn validate_rings(rings: &[Vec<[f64; 2]>], location: &str, result: &mut ValidationResult) {
    if rings.is_empty() {
        result.add_error(location.to_string(), "Polygon has no rings".to_string());
        return;
    }

    for (i, ring) in rings.iter().enumerate() {
        let ring_location = if i == 0 {
            format!("{location} exterior")
        } else {
            format!("{location} interior[{}]", i - 1)
        };

        if ring.len() < 4 {
            result.add_error(
                ring_location.clone(),
                format!("Ring must have at least 4 points, found {}", ring.len()),
            );
            continue;
        }

        if ring.first() != ring.last() {
            result.add_error(
                ring_location.clone(),
                "Ring must be closed (first point == last point)".to_string(),
            );
        }

        for (j, coord) in ring.iter().enumerate() {
            if !coord[0].is_finite() || !coord[1].is_finite() {
                result.add_error(
                    format!("{ring_location}[{j}]"),
                    "Coordinates must be finite".to_string(),
                );
            }
        }
    }
}
