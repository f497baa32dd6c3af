//! # Validate Subcommand
//!
//! Load every named manifest — or every `*.mnfs` under a named directory —
//! and report per-file results. The process exits non-zero when any file
//! fails, so CI can gate a collection on it.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use crate::walk::collect_manifests;

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Manifest files or collection directories.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

/// Run `mnfs validate`.
pub fn run(args: &ValidateArgs) -> Result<()> {
    let files = collect_manifests(&args.paths)?;
    if files.is_empty() {
        bail!("no .mnfs files found under the given paths");
    }

    let mut failures = 0usize;
    for path in &files {
        match mnfs_schema::load_path(path) {
            Ok(_) => println!("OK      {}", path.display()),
            Err(err) => {
                failures += 1;
                println!("FAILED  {err}");
            }
        }
    }

    tracing::debug!(total = files.len(), failures, "validation finished");
    if failures > 0 {
        bail!("{failures} of {} manifests failed to validate", files.len());
    }
    println!("{} manifests OK", files.len());
    Ok(())
}
