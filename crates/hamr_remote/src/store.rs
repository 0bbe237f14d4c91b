// Copyright (c) the Hamr Project Authors.
// Licensed under the MIT License.

//! The transport abstraction under the shared tier.

use std::time::Duration;

use bytes::Bytes;
use hamr_tier::Result;

/// An external key/blob store reachable by every process sharing the cache.
///
/// Implementations map these four operations onto their transport (Redis
/// `GET`/`SET EX`/`DEL`, an HTTP cache service, and so on). The store treats
/// blobs as opaque; the envelope framing above it is what makes concurrent
/// writers on different shape versions safe.
///
/// # Errors
///
/// All operations return [`hamr_tier::Error`] for transport failures. The
/// store must never invent a value: an unreachable backend is an `Err`, not
/// an `Ok(None)`.
pub trait BlobStore: Send + Sync {
    /// Fetches the blob for `key`, or `None` if absent or expired.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Bytes>>> + Send;

    /// Stores `blob` under `key` with the given time-to-live.
    fn put(&self, key: &str, blob: Bytes, ttl: Duration) -> impl Future<Output = Result<()>> + Send;

    /// Removes the blob for `key`. Removing an absent key is not an error.
    fn delete(&self, key: &str) -> impl Future<Output = Result<()>> + Send;

    /// Removes every blob in the store.
    fn clear(&self) -> impl Future<Output = Result<()>> + Send;
}
