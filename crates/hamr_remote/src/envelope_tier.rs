// Copyright (c) the Hamr Project Authors.
// Licensed under the MIT License.

//! The envelope codec layered over a blob store.

use std::{marker::PhantomData, time::Duration};

use hamr_shape::{
    Fingerprint, FingerprintWidth, Shaped,
    envelope::{self, Decoded},
};
use hamr_tier::{CacheEntry, CacheTier, Error, Result};
use tracing::{debug, warn};

/// A [`CacheTier`] that stores [`Shaped`] values as fingerprint-prefixed
/// envelopes in a [`crate::BlobStore`].
///
/// The expected fingerprint is computed once, here, at construction; every
/// read and write reuses it. On read, the three envelope outcomes map to
/// tier semantics:
///
/// - a matching fingerprint with a clean payload is a hit;
/// - a mismatched fingerprint is a miss — the blob was written by a different
///   shape version, which is normal during a rolling deploy;
/// - a matching fingerprint with a payload that will not deserialize is
///   corruption. It is logged loudly, the blob is deleted best-effort, and the
///   read degrades to a miss so callers fall back to the source of truth.
///
/// Entry metadata does not cross the wire: TTLs are enforced by the store at
/// write time, so an entry read back carries no `cached_at` stamp.
#[derive(Debug)]
pub struct EnvelopeTier<V, S> {
    store: S,
    expected: Fingerprint,
    width: FingerprintWidth,
    ttl: Duration,
    _value: PhantomData<fn() -> V>,
}

impl<V: Shaped, S> EnvelopeTier<V, S> {
    /// Wraps `store`, fingerprinting `V`'s shape.
    ///
    /// `ttl` is the default time-to-live for written blobs; a per-entry TTL on
    /// the [`CacheEntry`] overrides it.
    pub fn new(store: S, ttl: Duration, width: FingerprintWidth) -> Self {
        Self {
            store,
            expected: Fingerprint::of::<V>(),
            width,
            ttl,
            _value: PhantomData,
        }
    }

    /// Returns the fingerprint this tier expects on every envelope.
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        self.expected
    }

    /// Returns the wrapped store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<K, V, S> CacheTier<K, V> for EnvelopeTier<V, S>
where
    K: AsRef<str> + Send + Sync,
    V: Shaped + Clone + Send + Sync,
    S: crate::BlobStore,
{
    async fn get(&self, key: &K) -> Result<Option<CacheEntry<V>>> {
        let key = key.as_ref();
        let Some(blob) = self.store.get(key).await? else {
            return Ok(None);
        };

        match envelope::decode::<V>(&blob, self.expected, self.width) {
            Ok(Decoded::Value(value)) => Ok(Some(CacheEntry::new(value))),
            Ok(Decoded::SchemaMismatch { stored }) => {
                debug!(key, expected = %self.expected, %stored, "schema fingerprint mismatch, treating as miss");
                Ok(None)
            }
            Err(error) => {
                warn!(key, fingerprint = %self.expected, %error, "corrupt envelope, evicting and treating as miss");
                if let Err(delete_error) = self.store.delete(key).await {
                    warn!(key, %delete_error, "failed to evict corrupt envelope");
                }
                Ok(None)
            }
        }
    }

    async fn insert(&self, key: &K, entry: CacheEntry<V>) -> Result<()> {
        let ttl = entry.ttl().unwrap_or(self.ttl);
        let blob = envelope::encode(entry.value(), self.expected, self.width)
            .map_err(|source| Error::with_context("failed to encode envelope", source))?;
        self.store.put(key.as_ref(), blob, ttl).await
    }

    async fn invalidate(&self, key: &K) -> Result<()> {
        self.store.delete(key.as_ref()).await
    }

    async fn clear(&self) -> Result<()> {
        self.store.clear().await
    }
}
