// Copyright (c) the Hamr Project Authors.
// Licensed under the MIT License.

//! The core trait for cache storage backends.
//!
//! [`CacheTier`] defines the interface that both cache tiers implement: the
//! fast in-process tier and the slower shared tier. The trait is designed for
//! composition: implement the storage operations, then let `hamr` layer
//! envelope decoding, fallthrough, and miss coalescing on top.

use crate::{CacheEntry, Error};

/// Trait for cache tier implementations.
///
/// All four core methods are required: `get`, `insert`, `invalidate`, and
/// `clear`. Only `len` and `is_empty` have default implementations:
/// - `len`: returns `None` (not all tiers track size)
/// - `is_empty`: delegates to `len`
pub trait CacheTier<K, V>: Send + Sync {
    /// Gets a value, returning an error if the operation fails.
    fn get(&self, key: &K) -> impl Future<Output = Result<Option<CacheEntry<V>>, Error>> + Send;

    /// Inserts a value, returning an error if the operation fails.
    fn insert(&self, key: &K, entry: CacheEntry<V>) -> impl Future<Output = Result<(), Error>> + Send;

    /// Invalidates a value, returning an error if the operation fails.
    fn invalidate(&self, key: &K) -> impl Future<Output = Result<(), Error>> + Send;

    /// Clears all entries, returning an error if the operation fails.
    fn clear(&self) -> impl Future<Output = Result<(), Error>> + Send;

    /// Returns the number of entries, if supported.
    ///
    /// Returns `None` for implementations that don't track size.
    fn len(&self) -> Option<u64> {
        None
    }

    /// Returns `true` if the cache contains no entries.
    ///
    /// Returns `None` for implementations that don't track size.
    fn is_empty(&self) -> Option<bool> {
        self.len().map(|len| len == 0)
    }
}
