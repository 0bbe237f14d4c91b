// Copyright (c) the Hamr Project Authors.
// Licensed under the MIT License.

use crate::{CacheEntry, CacheTier, Error};

/// A tier that stores nothing.
///
/// Every read misses and every write succeeds without effect. Used as the
/// placeholder remote tier for caches configured with a local tier only.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullTier;

impl NullTier {
    /// Creates a new null tier.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl<K, V> CacheTier<K, V> for NullTier
where
    K: Sync,
    V: Send,
{
    async fn get(&self, _key: &K) -> Result<Option<CacheEntry<V>>, Error> {
        Ok(None)
    }

    async fn insert(&self, _key: &K, _entry: CacheEntry<V>) -> Result<(), Error> {
        Ok(())
    }

    async fn invalidate(&self, _key: &K) -> Result<(), Error> {
        Ok(())
    }

    async fn clear(&self) -> Result<(), Error> {
        Ok(())
    }

    fn len(&self) -> Option<u64> {
        Some(0)
    }
}
