use std::path::PathBuf;

use anyhow::Result;
use walkdir::WalkDir;

use crate::boundary;
use crate::cli::{Cli, PatchArgs};
use crate::common::fs::ensure_dir_exists;
use crate::config::{Config, NUTS_LEVELS};
use crate::index::SpatialIndex;

pub fn patch(cli: &Cli, args: &PatchArgs) -> Result<()> {
    let config = Config {
        cache_dir: args.cache_dir.clone(),
        years: args.years.clone(),
        max_distance: args.max_distance_km * 1_000.0,
    };
    ensure_dir_exists(&config.cache_dir)?;

    // Build all four level indices before touching any file; a boundary
    // failure here aborts the run, since no index is usable without it.
    let mut indices = Vec::with_capacity(NUTS_LEVELS.len());
    for &level in &NUTS_LEVELS {
        let set = boundary::build_combined(&config, level, cli.verbose)?;
        if cli.verbose > 0 {
            eprintln!("[boundaries] level {level}: {} regions", set.len());
        }
        indices.push(SpatialIndex::build(set)?);
    }

    let files = collect_tables(&args.inputs)?;
    anyhow::ensure!(!files.is_empty(), "no input tables found");
    if cli.verbose > 0 {
        eprintln!("[patch] {} table(s) to patch", files.len());
    }

    for file in &files {
        match crate::patch::patch_file(file, &indices, config.max_distance) {
            Ok(stats) => println!(
                "{}: {}/{} coordinate rows matched a NUTS 3 region",
                file.display(),
                stats.matched_finest,
                stats.with_coords
            ),
            // One unreadable table must not sink the rest of the batch.
            Err(err) => eprintln!("[patch] {}: {err:#}", file.display()),
        }
    }

    Ok(())
}

/// Expand the input list: directories are scanned for `.csv` files. Sorted
/// for a deterministic patch order.
fn collect_tables(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input) {
                let entry = entry?;
                if entry.file_type().is_file()
                    && entry.path().extension().is_some_and(|ext| ext == "csv")
                {
                    files.push(entry.into_path());
                }
            }
        } else {
            files.push(input.clone());
        }
    }
    files.sort();
    Ok(files)
}
