//! # mnfs-cli — mikroBUS Manifest Command-Line Interface
//!
//! A clap-based CLI over the `mnfs-schema` loader, for manifest authors
//! and board-support maintainers.
//!
//! ## Subcommands
//!
//! - `validate` — load manifest files or whole collections, report per file
//! - `inspect` — canonical text (or JSON model) plus the content digest
//! - `digest` — `sha256:<hex>` content digest per manifest
//! - `overlay` — Zephyr devicetree overlay for a board's primary device
//! - `drivers` — board → driver listing across a collection
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handlers delegate to `mnfs-schema` — no schema rules live here.
//! - Rendering helpers are plain functions, unit-testable without
//!   spawning the binary.

pub mod digest;
pub mod drivers;
pub mod inspect;
pub mod overlay;
pub mod validate;
pub mod walk;
