//! Download and cache of Eurostat GISCO boundary files.

use std::path::{Path, PathBuf};

use crate::error::BoundaryError;

/// Base URL of the GISCO NUTS GeoJSON distribution.
const GISCO_BASE_URL: &str = "https://gisco-services.ec.europa.eu/distribution/v2/nuts/geojson/";

/// Cache filename for one (year, level) boundary file.
fn geojson_filename(year: u16, level: u8) -> String {
    format!("NUTS_RG_01M_{year}_4326_LEVL_{level}.geojson")
}

/// Return the local boundary file for `(year, level)`, downloading it into
/// `cache_dir` on first use. A cached copy is returned without touching the
/// network.
pub fn fetch_boundaries(
    cache_dir: &Path,
    year: u16,
    level: u8,
    verbose: u8,
) -> Result<PathBuf, BoundaryError> {
    let filename = geojson_filename(year, level);
    let dest = cache_dir.join(&filename);
    if dest.exists() {
        if verbose > 0 {
            eprintln!("[fetch] using cached {filename}");
        }
        return Ok(dest);
    }

    let url = format!("{GISCO_BASE_URL}{filename}");
    if verbose > 0 {
        eprintln!("[fetch] {url} -> {}", dest.display());
    }
    download_file(&url, &dest)?;
    Ok(dest)
}

/// Download `url` to `dest` through a temp file in the same directory, so a
/// concurrent fetch of the same file never publishes partial bytes.
#[cfg(feature = "download")]
fn download_file(url: &str, dest: &Path) -> Result<(), BoundaryError> {
    use std::time::Duration;

    use tempfile::NamedTempFile;

    let acquisition = |reason: String| BoundaryError::Acquisition { url: url.to_string(), reason };

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| acquisition(format!("create dir {}: {e}", parent.display())))?;
    }

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("nutspatch/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(120))
        .build()
        .map_err(|e| acquisition(e.to_string()))?;

    let mut resp = client
        .get(url)
        .send()
        .map_err(|e| acquisition(e.to_string()))?
        .error_for_status()
        .map_err(|e| acquisition(e.to_string()))?;

    let mut tmp = NamedTempFile::new_in(dest.parent().unwrap_or(Path::new(".")))
        .map_err(|e| acquisition(format!("create temp file: {e}")))?;
    std::io::copy(&mut resp, &mut tmp)
        .map_err(|e| acquisition(format!("write {}: {e}", dest.display())))?;
    tmp.persist(dest)
        .map_err(|e| acquisition(format!("rename to {}: {e}", dest.display())))?;

    Ok(())
}

#[cfg(not(feature = "download"))]
fn download_file(url: &str, dest: &Path) -> Result<(), BoundaryError> {
    let _ = dest;
    Err(BoundaryError::Acquisition {
        url: url.to_string(),
        reason: "not cached, and this build has no `download` feature".to_string(),
    })
}
