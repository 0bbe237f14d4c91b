// Copyright (c) the Hamr Project Authors.
// Licensed under the MIT License.

use std::{hash::Hash, marker::PhantomData, time::Duration};

use crate::InMemoryTier;

/// Builder for configuring an [`InMemoryTier`].
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
#[derive(Debug)]
pub struct InMemoryTierBuilder<K, V> {
    pub(crate) max_capacity: Option<u64>,
    pub(crate) initial_capacity: Option<usize>,
    pub(crate) time_to_live: Option<Duration>,
    pub(crate) name: Option<String>,
    _phantom: PhantomData<(K, V)>,
}

impl<K, V> Default for InMemoryTierBuilder<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> InMemoryTierBuilder<K, V> {
    /// Creates a builder with no bounds and no TTL.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_capacity: None,
            initial_capacity: None,
            time_to_live: None,
            name: None,
            _phantom: PhantomData,
        }
    }

    /// Bounds the tier to at most `max_capacity` entries.
    ///
    /// Once full, entries are evicted by moka's TinyLFU policy.
    #[must_use]
    pub fn max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = Some(max_capacity);
        self
    }

    /// Pre-allocates room for roughly `initial_capacity` entries.
    #[must_use]
    pub fn initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = Some(initial_capacity);
        self
    }

    /// Sets the tier-level TTL.
    ///
    /// Keep this short relative to the shared tier so stale local copies age
    /// out quickly. A per-entry TTL on a [`hamr_tier::CacheEntry`] overrides it.
    #[must_use]
    pub fn time_to_live(mut self, ttl: Duration) -> Self {
        self.time_to_live = Some(ttl);
        self
    }

    /// Names the underlying moka cache, for diagnostics.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl<K, V> InMemoryTierBuilder<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Builds the tier.
    #[must_use]
    pub fn build(self) -> InMemoryTier<K, V> {
        InMemoryTier::from_builder(&self)
    }
}
