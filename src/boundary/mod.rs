//! NUTS boundary polygons and the multi-vintage merge that combines them.

mod geojson;

pub use geojson::read_regions;

use std::collections::HashSet;

use geo::MultiPolygon;

use crate::config::Config;
use crate::error::BoundaryError;
use crate::fetch;

/// One administrative region at a single NUTS level.
#[derive(Debug, Clone)]
pub struct Region {
    id: String,
    name: String,
    year: u16,
    geometry: MultiPolygon<f64>,
}

impl Region {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        year: u16,
        geometry: MultiPolygon<f64>,
    ) -> Self {
        Self { id: id.into(), name: name.into(), year, geometry }
    }

    /// NUTS identifier, e.g. "FR101". Unique within a merged set.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name, e.g. "Paris". May repeat across regions.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Boundary vintage this region was loaded from.
    pub fn year(&self) -> u16 {
        self.year
    }

    /// Boundary geometry in lon/lat degrees (EPSG:4326).
    pub fn geometry(&self) -> &MultiPolygon<f64> {
        &self.geometry
    }
}

/// The merged boundary polygons for one NUTS level.
///
/// Identifiers are unique within the set: a fallback-vintage region is
/// admitted only when its identifier is absent from every earlier vintage.
#[derive(Debug, Clone)]
pub struct BoundarySet {
    level: u8,
    regions: Vec<Region>,
}

impl BoundarySet {
    /// Merge per-vintage region batches, primary vintage first.
    ///
    /// Later batches only contribute identifiers not already present, so
    /// retired regions stay resolvable without ever shadowing current ones.
    /// Overlapping geometry between vintages is left alone; duplicate
    /// identifiers are the only collision signal.
    pub fn merge(level: u8, batches: Vec<Vec<Region>>, verbose: u8) -> Self {
        let mut seen: HashSet<String> = HashSet::new();
        let mut regions = Vec::new();

        for (batch_no, batch) in batches.into_iter().enumerate() {
            let year = batch.first().map(|region| region.year());
            let mut added = 0usize;
            for region in batch {
                if seen.insert(region.id.clone()) {
                    regions.push(region);
                    added += 1;
                }
            }
            if verbose > 0 && batch_no > 0 {
                if let Some(year) = year {
                    eprintln!("[merge] +{added} regions from {year} fallback (level {level})");
                }
            }
        }

        Self { level, regions }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }
}

/// Fetch, parse, and merge all configured vintages for one NUTS level.
pub fn build_combined(config: &Config, level: u8, verbose: u8) -> Result<BoundarySet, BoundaryError> {
    let mut batches = Vec::with_capacity(config.years.len());
    for &year in &config.years {
        let path = fetch::fetch_boundaries(&config.cache_dir, year, level, verbose)?;
        batches.push(read_regions(&path, year)?);
    }
    Ok(BoundarySet::merge(level, batches, verbose))
}
