//! # Descriptor Identifier Newtypes
//!
//! Newtype wrappers for the identifier namespaces of a mikroBUS manifest.
//! These prevent accidental identifier confusion — you cannot pass a
//! `BundleId` where a `StringId` is expected, even though both are a
//! single byte on the wire.
//!
//! String and property ids are `NonZeroU8`: id 0 is reserved on the wire
//! (reference fields use 0 for "no link"), so a descriptor carrying id 0
//! cannot be constructed at all. CPort ids are the one two-byte namespace.
//!
//! All ids display as plain decimal; the canonical writer applies its own
//! hex rendering.

use std::num::NonZeroU8;

use serde::{Deserialize, Serialize};

/// Identifier of a string descriptor. Ids start at 1; 0 means "no string"
/// in reference fields and is unrepresentable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StringId(NonZeroU8);

/// Identifier of a property descriptor. Ids start at 1; 0 means "no
/// property" in `prop-link` fields and is unrepresentable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PropertyId(NonZeroU8);

/// Identifier of a device descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeviceId(pub u8);

/// Identifier of a bundle descriptor. Bundle 0 is the control bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BundleId(pub u8);

/// Identifier of a CPort descriptor. CPort ids are two bytes wide;
/// CPort 0 is the control CPort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CportId(pub u16);

impl StringId {
    /// Construct from the wire byte. Returns `None` for the reserved id 0.
    pub fn new(raw: u8) -> Option<Self> {
        NonZeroU8::new(raw).map(Self)
    }

    /// The wire byte.
    pub fn get(&self) -> u8 {
        self.0.get()
    }
}

impl PropertyId {
    /// Construct from the wire byte. Returns `None` for the reserved id 0.
    pub fn new(raw: u8) -> Option<Self> {
        NonZeroU8::new(raw).map(Self)
    }

    /// The wire byte.
    pub fn get(&self) -> u8 {
        self.0.get()
    }
}

impl std::fmt::Display for StringId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.get())
    }
}

impl std::fmt::Display for PropertyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.get())
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for BundleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for CportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
