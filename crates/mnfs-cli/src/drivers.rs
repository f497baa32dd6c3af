//! # Drivers Subcommand
//!
//! Walk a manifest collection and report which kernel driver every board
//! relies on — the quick answer to "what must the target image enable?".

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use mnfs_schema::load_path;

use crate::walk::collect_manifests;

/// Arguments for the drivers subcommand.
#[derive(Args, Debug)]
pub struct DriversArgs {
    /// Collection directory (or a single manifest file).
    pub path: PathBuf,
}

/// Run `mnfs drivers`.
pub fn run(args: &DriversArgs) -> Result<()> {
    let files = collect_manifests(std::slice::from_ref(&args.path))?;
    if files.is_empty() {
        bail!("no .mnfs files found under '{}'", args.path.display());
    }

    let rows = collection_rows(&files);
    for (product, driver) in &rows {
        println!("{product}, {driver}");
    }
    println!("{} boards", rows.len());
    Ok(())
}

/// Resolve (product, driver) per loadable board, sorted by product.
/// Broken or device-less manifests are skipped with a warning rather
/// than failing the whole listing.
fn collection_rows(files: &[PathBuf]) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    for path in files {
        let manifest = match load_path(path) {
            Ok(manifest) => manifest,
            Err(err) => {
                tracing::warn!("skipping: {err}");
                continue;
            }
        };
        let Some(device) = manifest.primary_device() else {
            tracing::warn!("skipping '{}': no devices", path.display());
            continue;
        };
        let product = manifest.product().unwrap_or("?").to_string();
        let driver = manifest.driver(device).unwrap_or("?").to_string();
        rows.push((product, driver));
    }
    rows.sort();
    rows
}
