//! Nearest-region assignment of geocoded points.

use anyhow::Result;

use crate::index::SpatialIndex;

/// Outcome of resolving one observation against one NUTS level.
///
/// `Unresolved` is a normal result, not an error: the point simply lies
/// farther than the maximum join distance from every region at this level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Nearest region within the maximum join distance.
    Match { id: String, name: String },
    /// No region within the maximum join distance.
    Unresolved,
}

impl Resolution {
    /// Region identifier, or `""` when unresolved.
    pub fn id(&self) -> &str {
        match self {
            Resolution::Match { id, .. } => id,
            Resolution::Unresolved => "",
        }
    }

    /// Region name, or `""` when unresolved.
    pub fn name(&self) -> &str {
        match self {
            Resolution::Match { name, .. } => name,
            Resolution::Unresolved => "",
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Resolution::Match { .. })
    }
}

/// Resolve a single `(lon, lat)` observation against one level's index.
///
/// The point is projected into the index's planar CRS; the nearest region is
/// accepted iff its exact planar distance is at most `max_distance` metres.
pub fn resolve(index: &SpatialIndex, lon: f64, lat: f64, max_distance: f64) -> Result<Resolution> {
    let point = index.project(lon, lat)?;
    Ok(match index.nearest(point) {
        Some((idx, distance)) if distance <= max_distance => {
            let region = index.region(idx);
            Resolution::Match { id: region.id().to_string(), name: region.name().to_string() }
        }
        _ => Resolution::Unresolved,
    })
}

/// Batch form of [`resolve`]; output order matches input order.
pub fn resolve_many(
    index: &SpatialIndex,
    points: &[(f64, f64)],
    max_distance: f64,
) -> Result<Vec<Resolution>> {
    points.iter().map(|&(lon, lat)| resolve(index, lon, lat, max_distance)).collect()
}
