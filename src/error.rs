use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while acquiring or decoding boundary data.
///
/// Both variants are fatal for the NUTS level being built: no index can be
/// constructed from a missing or partially trusted boundary file.
#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error("failed to acquire {url}: {reason}")]
    Acquisition { url: String, reason: String },

    #[error("malformed boundary data in {}: {}", .path.display(), .reason)]
    Parse { path: PathBuf, reason: String },
}
