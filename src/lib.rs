#![doc = "Nutspatch public API"]
mod boundary;
pub mod cli;
pub mod commands;
mod common;
mod config;
mod error;
mod fetch;
mod index;
mod patch;
mod resolve;

#[doc(inline)]
pub use boundary::{build_combined, read_regions, BoundarySet, Region};

#[doc(inline)]
pub use config::{Config, MAX_JOIN_DISTANCE_M, NUTS_LEVELS, NUTS_YEARS};

#[doc(inline)]
pub use error::BoundaryError;

#[doc(inline)]
pub use fetch::fetch_boundaries;

#[doc(inline)]
pub use index::SpatialIndex;

#[doc(inline)]
pub use patch::{patch_file, patch_table, region_columns, PatchStats};

#[doc(inline)]
pub use resolve::{resolve, resolve_many, Resolution};
