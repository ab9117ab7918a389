//! CRS transformation between geographic and projected coordinates.
//!
//! Distances in degrees are geometrically meaningless, so both station
//! points and glacier centroids go through one projection into a metric
//! CRS before any distance is computed. The PROJ handle is built once
//! per run and reused for every point.

use proj::Proj;

use crate::error::{GlacimatchError, Result};
use crate::models::{Crs, Geometry};

/// Check if two CRS are the same
pub fn crs_match(a: &Crs, b: &Crs) -> bool {
    a.epsg == b.epsg
}

/// A reusable transform between two coordinate reference systems
pub struct Reprojector {
    from: Crs,
    to: Crs,
    /// `None` when source and target match; conversion is the identity
    proj: Option<Proj>,
}

impl Reprojector {
    pub fn new(from: &Crs, to: &Crs) -> Result<Self> {
        let proj = if crs_match(from, to) {
            None
        } else {
            let from_def = format!("EPSG:{}", from.epsg);
            let to_def = format!("EPSG:{}", to.epsg);
            let proj = Proj::new_known_crs(&from_def, &to_def, None).map_err(|e| {
                GlacimatchError::Projection {
                    from: from_def,
                    to: to_def,
                    reason: e.to_string(),
                }
            })?;
            Some(proj)
        };

        Ok(Self {
            from: from.clone(),
            to: to.clone(),
            proj,
        })
    }

    /// The transform in the opposite direction
    pub fn inverse(&self) -> Result<Self> {
        Self::new(&self.to, &self.from)
    }

    /// Convert a single coordinate pair
    pub fn project_point(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        match &self.proj {
            None => Ok((x, y)),
            Some(proj) => proj.convert((x, y)).map_err(|e| GlacimatchError::Projection {
                from: format!("EPSG:{}", self.from.epsg),
                to: format!("EPSG:{}", self.to.epsg),
                reason: e.to_string(),
            }),
        }
    }

    /// Convert every coordinate of a geometry
    pub fn reproject_geometry(&self, geometry: &Geometry) -> Result<Geometry> {
        match geometry {
            Geometry::Point { coordinates } => {
                let (x, y) = self.project_point(coordinates[0], coordinates[1])?;
                Ok(Geometry::point(x, y))
            }
            Geometry::Polygon { coordinates } => Ok(Geometry::Polygon {
                coordinates: self.project_rings(coordinates)?,
            }),
            Geometry::MultiPolygon { coordinates } => {
                let polygons = coordinates
                    .iter()
                    .map(|rings| self.project_rings(rings))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Geometry::MultiPolygon {
                    coordinates: polygons,
                })
            }
        }
    }

    fn project_rings(&self, rings: &[Vec<[f64; 2]>]) -> Result<Vec<Vec<[f64; 2]>>> {
        rings
            .iter()
            .map(|ring| {
                ring.iter()
                    .map(|c| self.project_point(c[0], c[1]).map(|(x, y)| [x, y]))
                    .collect()
            })
            .collect()
    }
}
