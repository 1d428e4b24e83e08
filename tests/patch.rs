// End-to-end behavior of the table patcher over synthetic boundary sets:
// nearest-region matches, the max-distance bound, idempotent re-patching,
// missing-coordinate passthrough, and stale column overwrite.

use std::fs;

use geo::{Coord, LineString, MultiPolygon, Polygon};
use nutspatch::{
    patch_file, resolve, BoundarySet, Region, Resolution, SpatialIndex, MAX_JOIN_DISTANCE_M,
};

/// Axis-aligned square around `(lon, lat)` with `half` degrees of half-width.
fn square(lon: f64, lat: f64, half: f64) -> MultiPolygon<f64> {
    MultiPolygon(vec![Polygon::new(
        LineString(vec![
            Coord { x: lon - half, y: lat - half },
            Coord { x: lon + half, y: lat - half },
            Coord { x: lon + half, y: lat + half },
            Coord { x: lon - half, y: lat + half },
            Coord { x: lon - half, y: lat - half },
        ]),
        vec![],
    )])
}

fn country_index() -> SpatialIndex {
    let regions = vec![
        Region::new("FR", "France", 2024, square(2.3, 48.8, 1.0)),
        Region::new("DE", "Germany", 2024, square(10.0, 51.0, 1.0)),
    ];
    SpatialIndex::build(BoundarySet::merge(0, vec![regions], 0)).unwrap()
}

/// One index per level; identifiers get one character longer per level the
/// way real NUTS codes do (FR, FR1, FR11, FR111).
fn level_indices() -> Vec<SpatialIndex> {
    (0u8..4)
        .map(|level| {
            let suffix = "1".repeat(level as usize);
            let regions = vec![
                Region::new(format!("FR{suffix}"), "France", 2024, square(2.3, 48.8, 1.0)),
                Region::new(format!("DE{suffix}"), "Germany", 2024, square(10.0, 51.0, 1.0)),
            ];
            SpatialIndex::build(BoundarySet::merge(level, vec![regions], 0)).unwrap()
        })
        .collect()
}

#[test]
fn point_inside_a_region_resolves_to_it() {
    let index = country_index();
    let r = resolve(&index, 2.35, 48.85, MAX_JOIN_DISTANCE_M).unwrap();
    assert_eq!(r, Resolution::Match { id: "FR".into(), name: "France".into() });
}

#[test]
fn point_on_a_region_vertex_resolves_at_distance_zero() {
    let index = country_index();
    // South-west corner of the FR square.
    let r = resolve(&index, 1.3, 47.8, 0.0).unwrap();
    assert_eq!(r.id(), "FR");
}

#[test]
fn coastal_point_within_bound_still_matches() {
    let index = country_index();
    // ~0.05 degrees (a few km) west of the FR square.
    let r = resolve(&index, 1.25, 48.8, MAX_JOIN_DISTANCE_M).unwrap();
    assert_eq!(r.id(), "FR");
}

#[test]
fn far_atlantic_point_is_unresolved() {
    let index = country_index();
    let r = resolve(&index, -30.0, 48.8, MAX_JOIN_DISTANCE_M).unwrap();
    assert_eq!(r, Resolution::Unresolved);
    assert_eq!(r.id(), "");
    assert_eq!(r.name(), "");
}

#[test]
fn resolving_twice_is_deterministic() {
    let index = country_index();
    let a = resolve(&index, 2.35, 48.85, MAX_JOIN_DISTANCE_M).unwrap();
    let b = resolve(&index, 2.35, 48.85, MAX_JOIN_DISTANCE_M).unwrap();
    assert_eq!(a, b);
}

#[test]
fn resolve_many_preserves_input_order() {
    let index = country_index();
    let points = [(10.0, 51.0), (-30.0, 48.8), (2.35, 48.85)];
    let results = nutspatch::resolve_many(&index, &points, MAX_JOIN_DISTANCE_M).unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].id(), "DE");
    assert_eq!(results[1].id(), "");
    assert_eq!(results[2].id(), "FR");
}

#[test]
fn retired_region_survives_the_vintage_merge() {
    let primary = vec![Region::new("FR", "France", 2024, square(2.3, 48.8, 1.0))];
    let fallback = vec![
        Region::new("FR", "France (2016)", 2016, square(2.3, 48.8, 1.0)),
        Region::new("UKI", "London", 2016, square(-0.1, 51.5, 0.5)),
    ];
    let set = BoundarySet::merge(2, vec![primary, fallback], 0);
    assert_eq!(set.len(), 2);

    let index = SpatialIndex::build(set).unwrap();
    let r = resolve(&index, -0.1, 51.5, MAX_JOIN_DISTANCE_M).unwrap();
    assert_eq!(r, Resolution::Match { id: "UKI".into(), name: "London".into() });
}

#[test]
fn patch_fills_region_columns_and_reports_match_rate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("observations.csv");
    fs::write(
        &path,
        "event,latitude,longitude\n\
         paris,48.85,2.35\n\
         berlin,51.0,10.0\n\
         atlantic,48.8,-30.0\n\
         nowhere,,\n",
    )
    .unwrap();

    let indices = level_indices();
    let stats = patch_file(&path, &indices, MAX_JOIN_DISTANCE_M).unwrap();
    assert_eq!(stats.rows, 4);
    assert_eq!(stats.with_coords, 3);
    assert_eq!(stats.matched_finest, 2);

    let out = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines[0],
        "event,latitude,longitude,nuts0_id,nuts0_name,nuts1_id,nuts1_name,nuts2_id,nuts2_name,nuts3_id,nuts3_name"
    );
    assert!(lines[1].starts_with("paris,"));
    assert!(lines[1].ends_with("FR,France,FR1,France,FR11,France,FR111,France"));
    assert!(lines[2].starts_with("berlin,"));
    assert!(lines[2].ends_with("DE,Germany,DE1,Germany,DE11,Germany,DE111,Germany"));
    // Beyond 50 km from everything: all eight region fields empty.
    assert!(lines[3].starts_with("atlantic,"));
    assert!(lines[3].ends_with(",,,,,,,,"));
    // No coordinates at all: untouched passthrough plus empty region fields.
    assert_eq!(lines[4], "nowhere,,,,,,,,,,");
}

#[test]
fn patching_twice_yields_identical_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("observations.csv");
    fs::write(
        &path,
        "event,latitude,longitude\n\
         paris,48.85,2.35\n\
         nowhere,,\n",
    )
    .unwrap();

    let indices = level_indices();
    patch_file(&path, &indices, MAX_JOIN_DISTANCE_M).unwrap();
    let first = fs::read_to_string(&path).unwrap();

    patch_file(&path, &indices, MAX_JOIN_DISTANCE_M).unwrap();
    let second = fs::read_to_string(&path).unwrap();
    assert_eq!(first, second);
}

#[test]
fn stale_region_columns_are_overwritten_not_duplicated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("observations.csv");
    fs::write(
        &path,
        "event,latitude,longitude,nuts0_id,nuts0_name\n\
         paris,48.85,2.35,XX,Junk\n",
    )
    .unwrap();

    let indices = level_indices();
    patch_file(&path, &indices, MAX_JOIN_DISTANCE_M).unwrap();

    let out = fs::read_to_string(&path).unwrap();
    assert!(!out.contains("XX"));
    assert!(!out.contains("Junk"));
    assert_eq!(out.matches("nuts0_id").count(), 1);
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[1].ends_with("FR,France,FR1,France,FR11,France,FR111,France"));
}

#[test]
fn table_without_any_coordinates_skips_spatial_work() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("observations.csv");
    fs::write(&path, "event,latitude,longitude\na,,\nb,,\n").unwrap();

    // No indices needed: the patcher must not attempt any resolution.
    let stats = patch_file(&path, &[], MAX_JOIN_DISTANCE_M).unwrap();
    assert_eq!(stats.rows, 2);
    assert_eq!(stats.with_coords, 0);
    assert_eq!(stats.matched_finest, 0);

    let out = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[1], "a,,,,,,,,,,");
    assert_eq!(lines[2], "b,,,,,,,,,,");
}

#[test]
fn table_without_coordinate_columns_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("observations.csv");
    fs::write(&path, "event,value\na,1\n").unwrap();

    let err = patch_file(&path, &level_indices(), MAX_JOIN_DISTANCE_M).unwrap_err();
    assert!(err.to_string().contains("latitude"));
}
