//! # Digest Subcommand
//!
//! Content digests of manifests, one `sha256:<hex>  <path>` line per
//! file. Digests are computed over the canonical rendering, so formatting
//! noise in the source never shows up in the value.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use crate::walk::collect_manifests;

/// Arguments for the digest subcommand.
#[derive(Args, Debug)]
pub struct DigestArgs {
    /// Manifest files or collection directories.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

/// Run `mnfs digest`.
pub fn run(args: &DigestArgs) -> Result<()> {
    let files = collect_manifests(&args.paths)?;
    if files.is_empty() {
        bail!("no .mnfs files found under the given paths");
    }
    for path in &files {
        let manifest = mnfs_schema::load_path(path)?;
        println!("{}  {}", mnfs_schema::digest(&manifest), path.display());
    }
    Ok(())
}
