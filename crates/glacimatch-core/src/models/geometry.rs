//! Geometry and CRS types for the match pipeline.
//!
//! The [`Geometry`] enum deliberately covers only the shapes this tool
//! can ingest: station points and areal glacier outlines. It serializes
//! as GeoJSON and converts to `geo` crate types for computation.

use serde::{Deserialize, Serialize};

/// Coordinate Reference System identified by EPSG code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crs {
    pub epsg: u32,
    pub name: String,
}

impl Default for Crs {
    fn default() -> Self {
        Self::wgs84()
    }
}

impl Crs {
    pub fn new(epsg: u32, name: impl Into<String>) -> Self {
        Self {
            epsg,
            name: name.into(),
        }
    }

    /// WGS 84 (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::new(4326, "WGS 84")
    }

    /// UTM zone 33N (EPSG:32633)
    pub fn utm33n() -> Self {
        Self::new(32633, "WGS 84 / UTM zone 33N")
    }

    /// Build a CRS from a bare EPSG code, naming the well-known ones.
    pub fn from_epsg(epsg: u32) -> Self {
        match epsg {
            4326 => Self::wgs84(),
            32633 => Self::utm33n(),
            _ => Self::new(epsg, format!("EPSG:{epsg}")),
        }
    }
}

/// Geometry type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    Polygon,
    MultiPolygon,
}

/// GeoJSON-compatible geometry representation
///
/// Maps directly to GeoJSON geometry objects with coordinate arrays;
/// positions are `[x, y]`, i.e. `[longitude, latitude]` in a geographic
/// CRS and `[easting, northing]` in a projected one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: [f64; 2],
    },
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
}

impl Geometry {
    /// Create a Point geometry
    pub fn point(x: f64, y: f64) -> Self {
        Geometry::Point {
            coordinates: [x, y],
        }
    }

    /// Create a Polygon geometry from its rings (exterior first)
    pub fn polygon(rings: Vec<Vec<[f64; 2]>>) -> Self {
        Geometry::Polygon {
            coordinates: rings,
        }
    }

    /// Create a MultiPolygon geometry
    pub fn multi_polygon(polygons: Vec<Vec<Vec<[f64; 2]>>>) -> Self {
        Geometry::MultiPolygon {
            coordinates: polygons,
        }
    }

    /// Get the geometry type
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point { .. } => GeometryType::Point,
            Geometry::Polygon { .. } => GeometryType::Polygon,
            Geometry::MultiPolygon { .. } => GeometryType::MultiPolygon,
        }
    }

    /// True for shapes a centroid-based polygon join can use
    pub fn is_areal(&self) -> bool {
        matches!(
            self,
            Geometry::Polygon { .. } | Geometry::MultiPolygon { .. }
        )
    }

    /// Try to parse from a serde_json::Value holding a GeoJSON geometry.
    ///
    /// Returns `None` for malformed values and for GeoJSON types this
    /// tool does not model (line strings and the like).
    pub fn from_geojson(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Convert to a `geo` crate geometry for computation
    pub fn to_geo(&self) -> geo::Geometry {
        match self {
            Geometry::Point { coordinates } => {
                geo::Geometry::Point(geo::Point::new(coordinates[0], coordinates[1]))
            }
            Geometry::Polygon { coordinates } => geo::Geometry::Polygon(rings_to_polygon(coordinates)),
            Geometry::MultiPolygon { coordinates } => geo::Geometry::MultiPolygon(
                geo::MultiPolygon::new(coordinates.iter().map(|p| rings_to_polygon(p)).collect()),
            ),
        }
    }

    /// Area-weighted centroid, or `None` for empty shapes.
    pub fn centroid_coords(&self) -> Option<[f64; 2]> {
        use geo::algorithm::centroid::Centroid;

        self.to_geo().centroid().map(|p| [p.x(), p.y()])
    }
}

fn rings_to_polygon(rings: &[Vec<[f64; 2]>]) -> geo::Polygon {
    let mut line_strings: Vec<geo::LineString> = rings
        .iter()
        .map(|ring| {
            geo::LineString::new(ring.iter().map(|c| geo::Coord { x: c[0], y: c[1] }).collect())
        })
        .collect();

    if line_strings.is_empty() {
        geo::Polygon::new(geo::LineString::new(vec![]), vec![])
    } else {
        let exterior = line_strings.remove(0);
        geo::Polygon::new(exterior, line_strings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_geometry_serialization_roundtrip() {
        let point = Geometry::point(8.0, 61.0);
        let json = serde_json::to_string(&point).unwrap();
        assert!(json.contains("Point"));

        let parsed: Geometry = serde_json::from_str(&json).unwrap();
        assert_eq!(point, parsed);
    }

    #[test]
    fn test_from_geojson_rejects_unmodelled_types() {
        let line = serde_json::json!({
            "type": "LineString",
            "coordinates": [[0.0, 0.0], [1.0, 1.0]]
        });
        assert!(Geometry::from_geojson(&line).is_none());
    }

    #[test]
    fn test_polygon_centroid() {
        let square = Geometry::polygon(vec![vec![
            [0.0, 0.0],
            [2.0, 0.0],
            [2.0, 2.0],
            [0.0, 2.0],
            [0.0, 0.0],
        ]]);
        let centroid = square.centroid_coords().unwrap();
        assert!((centroid[0] - 1.0).abs() < 1e-10);
        assert!((centroid[1] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_multipolygon_centroid_is_area_weighted() {
        // Two unit-area squares centered at (0.5, 0.5) and (10.5, 0.5):
        // the combined centroid sits halfway between them.
        let geom = Geometry::multi_polygon(vec![
            vec![vec![
                [0.0, 0.0],
                [1.0, 0.0],
                [1.0, 1.0],
                [0.0, 1.0],
                [0.0, 0.0],
            ]],
            vec![vec![
                [10.0, 0.0],
                [11.0, 0.0],
                [11.0, 1.0],
                [10.0, 1.0],
                [10.0, 0.0],
            ]],
        ]);
        let centroid = geom.centroid_coords().unwrap();
        assert!((centroid[0] - 5.5).abs() < 1e-9);
        assert!((centroid[1] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_crs_from_epsg() {
        assert_eq!(Crs::from_epsg(4326), Crs::wgs84());
        assert_eq!(Crs::from_epsg(32633), Crs::utm33n());
        assert_eq!(Crs::from_epsg(25833).name, "EPSG:25833");
    }

    proptest! {
        #[test]
        fn rectangle_centroid_is_its_center(
            x in -1000.0..1000.0f64,
            y in -1000.0..1000.0f64,
            w in 0.1..500.0f64,
            h in 0.1..500.0f64,
        ) {
            let rect = Geometry::polygon(vec![vec![
                [x, y],
                [x + w, y],
                [x + w, y + h],
                [x, y + h],
                [x, y],
            ]]);
            let centroid = rect.centroid_coords().unwrap();
            prop_assert!((centroid[0] - (x + w / 2.0)).abs() < 1e-6);
            prop_assert!((centroid[1] - (y + h / 2.0)).abs() < 1e-6);
        }
    }
}
