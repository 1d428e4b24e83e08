//! Nearest-region spatial index over a merged boundary set.

mod proj;

use anyhow::Result;
use geo::{BoundingRect, EuclideanDistance, MultiPolygon, Point, Rect};
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::boundary::{BoundarySet, Region};
use proj::PlanarProjection;

/// R-tree entry: one region's planar bounding box.
#[derive(Debug, Clone)]
struct RegionBounds {
    idx: usize, // Index of corresponding region in the boundary set
    bbox: Rect<f64>,
}

impl RTreeObject for RegionBounds {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

impl PointDistance for RegionBounds {
    // Bounding-box distance is a lower bound on the exact polygon distance,
    // which makes the R-tree's nearest-neighbor iteration a refinable
    // candidate order.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        self.envelope().distance_2(point)
    }
}

/// Read-only nearest-neighbor index over one level's merged regions.
///
/// Geometry is held in planar metres; query points must go through
/// [`SpatialIndex::project`] so both sides share the same CRS.
pub struct SpatialIndex {
    set: BoundarySet,
    shapes: Vec<MultiPolygon<f64>>,
    rtree: RTree<RegionBounds>,
    projection: PlanarProjection,
}

impl SpatialIndex {
    /// Project every region into the planar CRS and bulk-load the R-tree.
    pub fn build(set: BoundarySet) -> Result<Self> {
        let projection = PlanarProjection::new()?;
        let shapes: Vec<MultiPolygon<f64>> = set
            .regions()
            .iter()
            .map(|region| projection.project_shape(region.geometry()))
            .collect();
        let entries = shapes
            .iter()
            .enumerate()
            .filter_map(|(idx, shape)| shape.bounding_rect().map(|bbox| RegionBounds { idx, bbox }))
            .collect();
        Ok(Self { set, shapes, rtree: RTree::bulk_load(entries), projection })
    }

    /// NUTS level this index serves.
    pub fn level(&self) -> u8 {
        self.set.level()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.set.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Project a lon/lat query point into the index's planar CRS.
    pub(crate) fn project(&self, lon: f64, lat: f64) -> Result<Point<f64>> {
        self.projection.project_point(lon, lat)
    }

    pub(crate) fn region(&self, idx: usize) -> &Region {
        &self.set.regions()[idx]
    }

    /// Nearest region to a planar query point, as `(region index, metres)`.
    ///
    /// Candidates arrive in ascending bounding-box distance, so the scan
    /// stops once the next bounding box is farther than the best exact
    /// distance found. Exact distance ties go to the lexicographically
    /// smaller region identifier.
    pub(crate) fn nearest(&self, point: Point<f64>) -> Option<(usize, f64)> {
        let query = [point.x(), point.y()];
        let mut best: Option<(usize, f64)> = None;

        for (entry, bbox_d2) in self.rtree.nearest_neighbor_iter_with_distance_2(&query) {
            if let Some((_, best_d)) = best {
                if bbox_d2 > best_d * best_d {
                    break;
                }
            }
            let d = point.euclidean_distance(&self.shapes[entry.idx]);
            best = match best {
                None => Some((entry.idx, d)),
                Some((_, best_d)) if d < best_d => Some((entry.idx, d)),
                Some((best_idx, best_d))
                    if d == best_d && self.region(entry.idx).id() < self.region(best_idx).id() =>
                {
                    Some((entry.idx, d))
                }
                keep => keep,
            };
        }

        best
    }
}
