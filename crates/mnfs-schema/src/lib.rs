//! # mnfs-schema — Manifest Loading and Canonical Serialization
//!
//! Turns mikroBUS manifest (`.mnfs`) text into the typed, validated
//! [`Manifest`](mnfs_core::Manifest) model from `mnfs-core`, and renders
//! that model back out in one canonical form suitable for diffing and
//! fingerprinting.
//!
//! ## Loading Pipeline
//!
//! 1. [`parse`] — split the text into raw sections of `key = value`
//!    entries; no key is interpreted yet.
//! 2. [`load`] — type every section, enforce wire widths and per-section
//!    rules, then resolve every cross-reference. Fail-fast: the first
//!    defect (in a deterministic order) is the error.
//! 3. [`writer`] — the loaded manifest renders to [`CanonicalText`], the
//!    sole input to digest computation.
//!
//! ## Round-Trip Guarantee
//!
//! For any text that loads, loading its canonical rendition yields an
//! equal `Manifest` — comment, ordering, and radix noise in the source
//! can never reach the canonical form or the digest.

pub mod load;
pub mod parse;
pub mod writer;

// Re-export the primary operations for ergonomic imports.
pub use load::{load, load_path, LoadError};
pub use writer::{digest, to_canonical, CanonicalText};
