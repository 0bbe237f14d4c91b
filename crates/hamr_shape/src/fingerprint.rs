// Copyright (c) the Hamr Project Authors.
// Licensed under the MIT License.

//! Stable fingerprints of record shapes.

use xxhash_rust::xxh3::xxh3_128;

use crate::{ShapeDescriptor, Shaped};

/// A stable 128-bit hash of a [`ShapeDescriptor`].
///
/// Structurally identical shapes (same field names, same type tags, same
/// order) always produce the same fingerprint, across repeated calls, process
/// restarts, and machines. Any structural difference produces a different
/// fingerprint with overwhelming probability; the hash does not need to resist
/// adversarial collisions, only accidental shape drift.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(u128);

impl Fingerprint {
    /// Computes the fingerprint of a descriptor.
    ///
    /// Pure and total: any well-formed descriptor produces a fingerprint.
    #[must_use]
    pub fn compute(descriptor: &ShapeDescriptor) -> Self {
        Self(xxh3_128(&descriptor.canonical_bytes()))
    }

    /// Computes the fingerprint of a [`Shaped`] type's descriptor.
    ///
    /// Callers that need the fingerprint repeatedly should compute it once at
    /// construction time and hold on to it; the cache builder does exactly
    /// that.
    #[must_use]
    pub fn of<T: Shaped>() -> Self {
        Self::compute(&T::descriptor())
    }

    /// Reconstructs a fingerprint from its raw 128-bit value.
    #[must_use]
    pub const fn from_u128(raw: u128) -> Self {
        Self(raw)
    }

    /// Returns the raw 128-bit value.
    #[must_use]
    pub const fn as_u128(self) -> u128 {
        self.0
    }

    /// Returns the little-endian byte representation.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0.to_le_bytes()
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// How many bytes of the fingerprint an envelope carries.
///
/// 64 bits is plenty to distinguish accidental shape drift and is the
/// default; 128 bits is available for callers who want the full hash on the
/// wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FingerprintWidth {
    /// An 8-byte envelope prefix (the low half of the hash, little-endian).
    #[default]
    W64,
    /// The full 16-byte envelope prefix.
    W128,
}

impl FingerprintWidth {
    /// Returns the prefix width in bytes.
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::W64 => 8,
            Self::W128 => 16,
        }
    }
}
