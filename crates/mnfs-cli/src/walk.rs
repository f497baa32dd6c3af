//! # Manifest Collection Walk
//!
//! Shared path expansion for the subcommands that accept files or whole
//! collection directories: a file path passes through as-is, a directory
//! is walked recursively for `*.mnfs` files. Results are sorted so output
//! is stable across filesystems.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Expand files and directories into a sorted, deduplicated list of
/// manifest files.
pub fn collect_manifests(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            walk_dir(path, &mut files)?;
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            bail!("'{}' is neither a file nor a directory", path.display());
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("cannot read directory '{}'", dir.display()))?;
    for entry in entries {
        let path = entry
            .with_context(|| format!("cannot read directory '{}'", dir.display()))?
            .path();
        if path.is_dir() {
            walk_dir(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "mnfs") {
            files.push(path);
        }
    }
    Ok(())
}
