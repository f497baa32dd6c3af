//! # Schema Error Taxonomy
//!
//! The closed set of errors a manifest can fail to load with. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Every variant names the section it arose in, and where a key is
//!   involved, the key — a failing manifest can be corrected from the
//!   error alone, without re-running anything under a debugger.
//! - Loading is fail-fast: one manifest, at most one `SchemaError`, and
//!   for a given input always the same one.
//! - Syntax-level defects (malformed headers, bad section ids, lines that
//!   are not `key = value`) are `InvalidValue`, with the pseudo-keys
//!   `"section"` and `"id"` naming header and id problems.

use thiserror::Error;

/// An error raised while loading a manifest from its textual form.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A section header names no descriptor block the format defines.
    #[error("invalid descriptor '[{section}]'")]
    UnknownSection {
        /// The unrecognized header, as written.
        section: String,
    },

    /// A required singleton section never appeared.
    #[error("missing section '[{section}]'")]
    MissingSection {
        /// Name of the absent section.
        section: String,
    },

    /// A section lacks a key it must carry.
    #[error("missing field '{key}' in '[{section}]'")]
    MissingKey {
        /// The section missing the key.
        section: String,
        /// The absent key.
        key: String,
    },

    /// Two descriptors of the same kind share an id, or a singleton
    /// section appears twice.
    #[error("duplicated id for '[{section}]'")]
    DuplicateId {
        /// Header of the second occurrence.
        section: String,
    },

    /// A reference field names an id with no matching descriptor.
    #[error("field '{key}' in '[{section}]' references missing id {id}")]
    DanglingReference {
        /// The section holding the reference.
        section: String,
        /// The reference field.
        key: String,
        /// The id that resolved to nothing.
        id: u8,
    },

    /// A value failed a syntactic or semantic check.
    #[error("invalid value for field '{key}' in '[{section}]': {reason}")]
    InvalidValue {
        /// The section holding the value.
        section: String,
        /// The offending key.
        key: String,
        /// What was wrong with it.
        reason: String,
    },
}
