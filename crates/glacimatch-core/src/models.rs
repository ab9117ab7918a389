pub mod geometry;
pub mod glacier;
pub mod matched;
pub mod station;

pub use geometry::{Crs, Geometry, GeometryType};
pub use glacier::{Glacier, GlacierCollection};
pub use matched::{MatchReport, MatchedStation, NearestGlacier};
pub use station::{StationRecord, StationTable};
