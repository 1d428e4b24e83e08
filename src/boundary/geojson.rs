//! GeoJSON reader for NUTS boundary files.

use std::{fs, path::Path};

use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::Value;

use crate::boundary::Region;
use crate::error::BoundaryError;

/// Read all regions from a NUTS GeoJSON FeatureCollection, keeping only the
/// identifier, display name, and geometry of each feature. `year` tags every
/// region with the vintage it came from.
pub fn read_regions(path: &Path, year: u16) -> Result<Vec<Region>, BoundaryError> {
    let parse = |reason: String| BoundaryError::Parse { path: path.to_path_buf(), reason };

    let bytes = fs::read(path).map_err(|e| parse(format!("read: {e}")))?;
    let value: Value =
        serde_json::from_slice(&bytes).map_err(|e| parse(format!("invalid JSON: {e}")))?;
    parse_collection(&value, year).map_err(parse)
}

fn parse_collection(value: &Value, year: u16) -> Result<Vec<Region>, String> {
    let features = value["features"].as_array().ok_or("missing \"features\" array")?;

    let mut regions = Vec::with_capacity(features.len());
    for feature in features {
        let props = &feature["properties"];
        let id = props["NUTS_ID"].as_str().ok_or("feature without NUTS_ID property")?;
        let name = props["NUTS_NAME"]
            .as_str()
            .ok_or_else(|| format!("feature {id} without NUTS_NAME property"))?;
        let geometry = parse_geometry(&feature["geometry"])
            .map_err(|reason| format!("feature {id}: {reason}"))?;
        regions.push(Region::new(id, name, year, geometry));
    }
    Ok(regions)
}

/// Parse a GeoJSON geometry into a MultiPolygon; plain Polygon features come
/// back as a single-element MultiPolygon.
fn parse_geometry(geometry: &Value) -> Result<MultiPolygon<f64>, String> {
    let coords = geometry["coordinates"].as_array().ok_or("geometry without coordinates")?;
    match geometry["type"].as_str() {
        Some("Polygon") => Ok(MultiPolygon(vec![parse_polygon(coords)?])),
        Some("MultiPolygon") => {
            let polygons = coords
                .iter()
                .map(|rings| {
                    rings
                        .as_array()
                        .ok_or_else(|| "malformed polygon in MultiPolygon".to_string())
                        .and_then(|rings| parse_polygon(rings))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(MultiPolygon(polygons))
        }
        other => Err(format!("unsupported geometry type {other:?}")),
    }
}

/// First ring is the exterior, the rest are holes.
fn parse_polygon(rings: &[Value]) -> Result<Polygon<f64>, String> {
    let exterior = rings
        .first()
        .and_then(|ring| ring.as_array())
        .ok_or("polygon without exterior ring")?;
    let interiors = rings[1..]
        .iter()
        .map(|ring| {
            ring.as_array()
                .ok_or_else(|| "malformed interior ring".to_string())
                .and_then(|ring| parse_ring(ring))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(parse_ring(exterior)?, interiors))
}

/// Parse a ring of `[x, y]` positions.
fn parse_ring(coords: &[Value]) -> Result<LineString<f64>, String> {
    let mut points = Vec::with_capacity(coords.len());
    for pair in coords {
        let pair = pair.as_array().ok_or("coordinate is not an array")?;
        let x = pair.first().and_then(|v| v.as_f64()).ok_or("coordinate x must be a number")?;
        let y = pair.get(1).and_then(|v| v.as_f64()).ok_or("coordinate y must be a number")?;
        points.push(Coord { x, y });
    }

    // Ensure ring is closed (first point == last point)
    if !points.is_empty() && points[0] != points[points.len() - 1] {
        points.push(points[0]);
    }

    Ok(LineString(points))
}
