//! Nearest-centroid lookup over an R-tree of projected glacier
//! centroids.
//!
//! Ties between equidistant centroids are broken arbitrarily: whichever
//! candidate the tree yields first wins.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// A glacier centroid in projected coordinates, tagged with the index of
/// its glacier in the source collection.
#[derive(Debug, Clone, PartialEq)]
pub struct GlacierCentroid {
    pub glacier: usize,
    pub position: [f64; 2],
}

impl RTreeObject for GlacierCentroid {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for GlacierCentroid {
    /// Squared Euclidean distance; the tree compares squared distances
    /// to avoid the square root during traversal.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Spatial index answering nearest-glacier queries
pub struct NearestGlacierIndex {
    tree: RTree<GlacierCentroid>,
}

impl NearestGlacierIndex {
    pub fn build(centroids: Vec<GlacierCentroid>) -> Self {
        Self {
            tree: RTree::bulk_load(centroids),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Nearest centroid to a projected point with the straight-line
    /// distance in the unit of the projected CRS (meters for UTM).
    pub fn nearest(&self, point: [f64; 2]) -> Option<(usize, f64)> {
        self.tree
            .nearest_neighbor(&point)
            .map(|c| (c.glacier, c.distance_2(&point).sqrt()))
    }

    /// Like [`Self::nearest`] but discards matches beyond `max_distance`
    pub fn nearest_within(&self, point: [f64; 2], max_distance: f64) -> Option<(usize, f64)> {
        self.nearest(point)
            .filter(|(_, distance)| *distance <= max_distance)
    }
}
