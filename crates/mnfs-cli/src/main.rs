//! # mnfs CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// mikroBUS manifest toolchain.
///
/// Validates add-on board manifests, prints canonical renderings and
/// content digests, generates Zephyr devicetree overlays, and lists the
/// drivers a manifest collection relies on.
#[derive(Parser, Debug)]
#[command(name = "mnfs", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Validate manifest files or whole collection directories.
    Validate(mnfs_cli::validate::ValidateArgs),
    /// Print a manifest's canonical text and content digest.
    Inspect(mnfs_cli::inspect::InspectArgs),
    /// Print content digests of manifest files.
    Digest(mnfs_cli::digest::DigestArgs),
    /// Render a Zephyr devicetree overlay for a board's primary device.
    Overlay(mnfs_cli::overlay::OverlayArgs),
    /// List the driver each board in a collection relies on.
    Drivers(mnfs_cli::drivers::DriversArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate(args) => mnfs_cli::validate::run(&args),
        Commands::Inspect(args) => mnfs_cli::inspect::run(&args),
        Commands::Digest(args) => mnfs_cli::digest::run(&args),
        Commands::Overlay(args) => mnfs_cli::overlay::run(&args),
        Commands::Drivers(args) => mnfs_cli::drivers::run(&args),
    }
}
