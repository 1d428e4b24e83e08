use std::path::PathBuf;

/// NUTS vintages to combine, primary first. Later entries only contribute
/// regions whose identifier is absent from earlier ones, so boundaries
/// retired between releases (e.g. UK regions after Brexit) stay resolvable.
pub const NUTS_YEARS: [u16; 2] = [2024, 2016];

/// Granularity levels, coarsest (country) to finest (small region).
pub const NUTS_LEVELS: [u8; 4] = [0, 1, 2, 3];

/// Farthest planar distance, in metres, at which a point may still be
/// assigned to a region. Generous enough for coastal points lying just
/// outside simplified coastline polygons.
pub const MAX_JOIN_DISTANCE_M: f64 = 50_000.0;

/// Run configuration for the patcher.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory where downloaded boundary files are cached.
    pub cache_dir: PathBuf,
    /// Boundary vintages in priority order (primary first).
    pub years: Vec<u16>,
    /// Maximum nearest-region join distance in metres.
    pub max_distance: f64,
}

impl Config {
    /// Configuration with the default vintages and join distance.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            years: NUTS_YEARS.to_vec(),
            max_distance: MAX_JOIN_DISTANCE_M,
        }
    }
}
