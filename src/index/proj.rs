//! Planar projection used for nearest-region distance computation.

use anyhow::{anyhow, Context, Result};
use geo::{Coord, MapCoords, MultiPolygon, Point};
use proj4rs::{proj::Proj, transform::transform};

/// Geographic source CRS of the GISCO boundary files (WGS84 lon/lat).
const WGS84_PROJ4: &str = "+proj=longlat +datum=WGS84 +no_defs +type=crs";

/// ETRS89-extended / LAEA Europe (EPSG:3035): equal-area and metre-based, so
/// Euclidean distance in the plane tracks ground distance across the
/// continent.
const LAEA_EUROPE_PROJ4: &str =
    "+proj=laea +lat_0=52 +lon_0=10 +x_0=4321000 +y_0=3210000 +ellps=GRS80 +units=m +no_defs +type=crs";

/// Transformer from lon/lat degrees to planar metres.
pub(crate) struct PlanarProjection {
    from: Proj,
    to: Proj,
}

impl PlanarProjection {
    pub(crate) fn new() -> Result<Self> {
        let from = Proj::from_proj_string(WGS84_PROJ4)
            .with_context(|| anyhow!("failed to build source PROJ.4: {WGS84_PROJ4}"))?;
        let to = Proj::from_proj_string(LAEA_EUROPE_PROJ4)
            .with_context(|| anyhow!("failed to build target PROJ.4: {LAEA_EUROPE_PROJ4}"))?;
        Ok(Self { from, to })
    }

    /// Project a single lon/lat point to planar metres.
    pub(crate) fn project_point(&self, lon: f64, lat: f64) -> Result<Point<f64>> {
        let mut point = (lon.to_radians(), lat.to_radians(), 0.0);
        transform(&self.from, &self.to, &mut point)
            .map_err(|e| anyhow!("CRS transform failed for ({lon}, {lat}): {e}"))?;
        Ok(Point::new(point.0, point.1))
    }

    /// Reproject a lon/lat shape into planar metres.
    pub(crate) fn project_shape(&self, shape: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        // Map coords → radians in, meters out.
        shape.map_coords(|coord: Coord<f64>| {
            let mut point = (coord.x.to_radians(), coord.y.to_radians(), 0.0);
            transform(&self.from, &self.to, &mut point).expect("CRS transform failed");
            Coord { x: point.0, y: point.1 }
        })
    }
}
