//! # Content Digest
//!
//! `ContentDigest` and `DigestAlgorithm` for fingerprinting manifests.
//!
//! Two textual renditions of the same board must fingerprint identically,
//! so manifest digests are only ever computed over the canonical text —
//! `mnfs-schema`'s `CanonicalText` is the sole caller of [`sha256_digest`]
//! for manifest content. This module carries the algorithm-tagged digest
//! value itself and the raw hashing primitive.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The hash algorithm that produced a content digest.
///
/// Only SHA-256 is in use; the tag keeps stored digests self-describing
/// should another algorithm ever join it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    /// SHA-256.
    Sha256,
}

impl DigestAlgorithm {
    /// Returns the algorithm identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A digest value with its algorithm tag.
///
/// Displays as `sha256:<64 hex chars>`, the form the CLI prints and tools
/// downstream compare against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    /// The hash algorithm that produced this digest.
    pub algorithm: DigestAlgorithm,
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Assemble a digest from its parts. Prefer [`sha256_digest`] when
    /// hashing fresh content.
    pub fn new(algorithm: DigestAlgorithm, bytes: [u8; 32]) -> Self {
        Self { algorithm, bytes }
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

/// Compute a SHA-256 content digest.
///
/// This is the hashing primitive; manifest fingerprints must come via the
/// canonical writer so that formatting noise in the source never changes
/// the digest.
pub fn sha256_digest(data: &[u8]) -> ContentDigest {
    let hash = Sha256::digest(data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest::new(DigestAlgorithm::Sha256, bytes)
}
