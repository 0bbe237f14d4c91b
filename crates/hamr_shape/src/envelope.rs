// Copyright (c) the Hamr Project Authors.
// Licensed under the MIT License.

//! The fingerprint-prefixed binary envelope.
//!
//! Wire format: `[fingerprint prefix: 8 or 16 bytes, little-endian][payload:
//! bincode]`, stored verbatim as the value blob in the shared tier.
//!
//! The envelope is self-describing only with respect to shape *identity*, not
//! shape *content*: there is no partial or forward-compatible decoding. A
//! fingerprint mismatch is a hard miss, never a partial read. That split is
//! the point of the format — "shape changed" (expected, frequent) degrades to
//! a cache miss, while "bytes corrupted despite a matching shape" (rare, a
//! bug) is surfaced loudly as [`EnvelopeError::Corrupt`].

use bytes::{BufMut, Bytes, BytesMut};
use serde::{Serialize, de::DeserializeOwned};

use crate::{Fingerprint, FingerprintWidth};

/// Error from envelope encoding or decoding.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// The value could not be serialized.
    ///
    /// Does not occur for well-formed in-memory values of a registered shape;
    /// it exists because the serializer's contract says it can.
    #[error("failed to encode payload: {0}")]
    Encode(#[source] bincode::Error),

    /// The blob is shorter than the fingerprint prefix.
    #[error("envelope truncated: {len} bytes, need at least {need}")]
    Truncated {
        /// Length of the blob.
        len: usize,
        /// Minimum length required by the configured fingerprint width.
        need: usize,
    },

    /// The fingerprint matched but the payload failed to deserialize.
    ///
    /// This indicates corruption or a descriptor that lies about its type's
    /// actual layout — a bug, not a schema evolution event.
    #[error("payload corrupt despite matching fingerprint {fingerprint}: {source}")]
    Corrupt {
        /// The matching fingerprint found in the envelope.
        fingerprint: Fingerprint,
        /// The underlying deserialization failure.
        #[source]
        source: bincode::Error,
    },
}

/// Outcome of decoding an envelope.
#[derive(Debug, PartialEq)]
pub enum Decoded<T> {
    /// The fingerprint matched and the payload deserialized cleanly.
    Value(T),
    /// The embedded fingerprint differs from the expected one.
    ///
    /// This is the schema-safety guarantee at work: the entry was written by
    /// a different version of the shape and must be treated as a cache miss.
    SchemaMismatch {
        /// The fingerprint found in the envelope, zero-extended to 128 bits
        /// when the configured width carries only the low 64.
        stored: Fingerprint,
    },
}

impl<T> Decoded<T> {
    /// Returns the decoded value, or `None` on a schema mismatch.
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::SchemaMismatch { .. } => None,
        }
    }
}

/// Encodes a value into a fingerprint-prefixed envelope.
///
/// # Errors
///
/// Returns [`EnvelopeError::Encode`] if the payload cannot be serialized;
/// this does not happen for plain data shapes.
pub fn encode<T: Serialize>(value: &T, fingerprint: Fingerprint, width: FingerprintWidth) -> Result<Bytes, EnvelopeError> {
    let payload = bincode::serialize(value).map_err(EnvelopeError::Encode)?;
    let mut blob = BytesMut::with_capacity(width.bytes() + payload.len());
    blob.put_slice(&fingerprint.to_bytes()[..width.bytes()]);
    blob.put_slice(&payload);
    Ok(blob.freeze())
}

/// Decodes an envelope, verifying its fingerprint against `expected`.
///
/// A fingerprint mismatch is reported as [`Decoded::SchemaMismatch`], not an
/// error. Deserialization failure under a *matching* fingerprint is
/// [`EnvelopeError::Corrupt`], as is a blob too short to carry the prefix.
///
/// # Errors
///
/// Returns [`EnvelopeError::Truncated`] or [`EnvelopeError::Corrupt`]; both
/// mean the stored bytes are bad, never that the schema legitimately moved on.
pub fn decode<T: DeserializeOwned>(blob: &[u8], expected: Fingerprint, width: FingerprintWidth) -> Result<Decoded<T>, EnvelopeError> {
    let need = width.bytes();
    if blob.len() < need {
        return Err(EnvelopeError::Truncated { len: blob.len(), need });
    }

    let (prefix, payload) = blob.split_at(need);
    if prefix != &expected.to_bytes()[..need] {
        let mut stored = [0u8; 16];
        stored[..need].copy_from_slice(prefix);
        return Ok(Decoded::SchemaMismatch {
            stored: Fingerprint::from_u128(u128::from_le_bytes(stored)),
        });
    }

    let value = bincode::deserialize(payload).map_err(|source| EnvelopeError::Corrupt {
        fingerprint: expected,
        source,
    })?;
    Ok(Decoded::Value(value))
}
