//! # mnfs-core — Foundational Types for the mikroBUS Manifest Toolchain
//!
//! This crate is the bedrock of the mnfs workspace. It defines the typed
//! model of a mikroBUS add-on board manifest — the descriptor records, the
//! identifier namespaces, the pin and protocol tables — together with the
//! error taxonomy the loader reports through and the content-digest
//! primitives used to fingerprint canonical manifests. Every other crate
//! in the workspace depends on `mnfs-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for wire identifiers.** `StringId`, `PropertyId`,
//!    `DeviceId`, `BundleId`, `CportId` — you cannot hand a bundle id to a
//!    field expecting a string id. `StringId` and `PropertyId` carry a
//!    `NonZeroU8` because id 0 is reserved on the wire, so "reference to
//!    nothing" is unrepresentable once a descriptor exists.
//!
//! 2. **Open numeric code sets stay numeric.** Protocol and class numbers
//!    outside the published tables are legal manifest content ("Reserved"),
//!    so [`Protocol`], [`BundleClass`], [`PropertyType`], and [`PinState`]
//!    wrap the raw byte instead of enumerating it. The upstream name tables
//!    hang off accessor methods.
//!
//! 3. **A closed error taxonomy.** [`SchemaError`] has exactly the variants
//!    a failing manifest can be corrected from, and every variant names the
//!    section (and where applicable the key) it arose in.
//!
//! 4. **Descriptor records are plain immutable data.** No interior
//!    mutability, no lifecycle. A [`Manifest`] is only ever produced whole
//!    by the loader in `mnfs-schema`, already cross-checked.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `mnfs-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod descriptor;
pub mod digest;
pub mod error;
pub mod id;
pub mod pins;
pub mod protocol;

// Re-export primary types for ergonomic imports.
pub use descriptor::{
    BundleDescriptor, CportDescriptor, DeviceDescriptor, InterfaceDescriptor, Irq, Manifest,
    ManifestHeader, MikrobusDescriptor, PropertyDescriptor, PropertyType, StringDescriptor,
};
pub use digest::{sha256_digest, ContentDigest, DigestAlgorithm};
pub use error::SchemaError;
pub use id::{BundleId, CportId, DeviceId, PropertyId, StringId};
pub use pins::{PinRole, PinState};
pub use protocol::{BundleClass, Protocol};
