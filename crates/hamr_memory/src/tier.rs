// Copyright (c) the Hamr Project Authors.
// Licensed under the MIT License.

//! Local tier implementation using moka.

use std::hash::Hash;

use hamr_tier::{CacheEntry, CacheTier, Error};
use moka::future::Cache;

use crate::builder::InMemoryTierBuilder;

/// An in-memory cache tier backed by moka.
///
/// Reads and writes are lock-free and safe from any number of tasks. Eviction
/// under capacity pressure uses moka's `TinyLFU` policy; age-based expiry
/// combines the tier-level TTL configured on the builder with per-entry TTLs
/// carried on the [`CacheEntry`] itself, whichever is stricter.
///
/// Cloning the tier is cheap and clones share the same underlying storage.
///
/// # Examples
///
/// ```
/// use hamr_memory::InMemoryTier;
/// use hamr_tier::{CacheEntry, CacheTier};
/// # futures::executor::block_on(async {
///
/// let tier = InMemoryTier::<String, i32>::new();
///
/// tier.insert(&"key".to_string(), CacheEntry::new(42)).await?;
/// let value = tier.get(&"key".to_string()).await?;
/// assert_eq!(*value.unwrap().value(), 42);
/// # Ok::<(), hamr_tier::Error>(())
/// # });
/// ```
#[derive(Debug)]
pub struct InMemoryTier<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Cache<K, CacheEntry<V>>,
}

impl<K, V> Clone for InMemoryTier<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V> Default for InMemoryTier<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> InMemoryTier<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Creates a new unbounded tier with no TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a new tier bounded to `max_capacity` entries.
    ///
    /// Once the capacity is reached, entries are evicted using the `TinyLFU`
    /// policy (combination of LRU eviction and LFU admission).
    #[must_use]
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self::builder().max_capacity(max_capacity).build()
    }

    /// Creates a new builder for configuring a tier.
    ///
    /// # Examples
    ///
    /// ```
    /// use hamr_memory::InMemoryTier;
    /// use std::time::Duration;
    ///
    /// let tier = InMemoryTier::<String, i32>::builder()
    ///     .max_capacity(1000)
    ///     .time_to_live(Duration::from_secs(60))
    ///     .build();
    /// ```
    #[must_use]
    pub fn builder() -> InMemoryTierBuilder<K, V> {
        InMemoryTierBuilder::new()
    }

    pub(crate) fn from_builder(builder: &InMemoryTierBuilder<K, V>) -> Self {
        let mut moka_builder = Cache::builder();

        if let Some(capacity) = builder.max_capacity {
            moka_builder = moka_builder.max_capacity(capacity);
        }

        if let Some(capacity) = builder.initial_capacity {
            moka_builder = moka_builder.initial_capacity(capacity);
        }

        if let Some(ttl) = builder.time_to_live {
            moka_builder = moka_builder.time_to_live(ttl);
        }

        if let Some(name) = builder.name.as_deref() {
            moka_builder = moka_builder.name(name);
        }

        Self {
            inner: moka_builder.build(),
        }
    }

    /// Flushes moka's pending maintenance work so that expired and evicted
    /// entries are reflected in [`CacheTier::len`].
    pub async fn evict_expired(&self) {
        self.inner.run_pending_tasks().await;
    }
}

impl<K, V> CacheTier<K, V> for InMemoryTier<K, V>
where
    K: Clone + Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Result<Option<CacheEntry<V>>, Error> {
        let Some(entry) = self.inner.get(key).await else {
            return Ok(None);
        };

        // A per-entry TTL is stricter than the tier-level one, so moka alone
        // cannot enforce it; check it on the way out.
        if entry.is_expired() {
            self.inner.invalidate(key).await;
            return Ok(None);
        }

        Ok(Some(entry))
    }

    async fn insert(&self, key: &K, mut entry: CacheEntry<V>) -> Result<(), Error> {
        entry.stamp();
        self.inner.insert(key.clone(), entry).await;
        Ok(())
    }

    async fn invalidate(&self, key: &K) -> Result<(), Error> {
        self.inner.invalidate(key).await;
        Ok(())
    }

    async fn clear(&self) -> Result<(), Error> {
        self.inner.invalidate_all();
        Ok(())
    }

    fn len(&self) -> Option<u64> {
        Some(self.inner.entry_count())
    }
}
