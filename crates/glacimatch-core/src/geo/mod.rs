//! Spatial operations: CRS transforms, nearest-centroid lookup, and
//! geometry validation.

pub mod nearest;
pub mod transform;
pub mod validation;

pub use nearest::{GlacierCentroid, NearestGlacierIndex};
pub use transform::{crs_match, Reprojector};
pub use validation::{validate_geometry, ValidationError, ValidationResult};
