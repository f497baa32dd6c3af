//! # Inspect Subcommand
//!
//! Print a manifest in canonical form — exactly the digest input — with
//! the digest as a comment trailer, or the typed model as JSON.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use mnfs_schema::{load_path, to_canonical};

/// Arguments for the inspect subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Manifest file to inspect.
    pub file: PathBuf,

    /// Emit the typed model as JSON instead of canonical text.
    #[arg(long)]
    pub json: bool,
}

/// Run `mnfs inspect`.
pub fn run(args: &InspectArgs) -> Result<()> {
    let manifest = load_path(&args.file)?;
    let canonical = to_canonical(&manifest);

    if args.json {
        let rendering = serde_json::json!({
            "digest": canonical.digest().to_string(),
            "manifest": manifest,
        });
        println!("{}", serde_json::to_string_pretty(&rendering)?);
    } else {
        // The trailer is a comment, so the output is still a loadable
        // manifest.
        print!("{canonical}");
        println!("\n; {}", canonical.digest());
    }
    Ok(())
}
