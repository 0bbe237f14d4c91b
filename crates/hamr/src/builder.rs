// Copyright (c) the Hamr Project Authors.
// Licensed under the MIT License.

//! Builder for constructing two-tier caches.

use std::{hash::Hash, marker::PhantomData};

use hamr_memory::InMemoryTier;
use hamr_remote::{BlobStore, EnvelopeTier};
use hamr_shape::Shaped;
use hamr_tier::{CacheTier, NullTier};

use crate::{Cache, CacheConfig, CacheName, builder::sealed::Sealed};

mod sealed {
    pub(crate) trait Sealed {}
}

/// A tier selection held by a [`CacheBuilder`].
///
/// Selections are placeholders: `memory()` records that a moka tier is
/// wanted, `remote()` records the blob store to wrap. The concrete tier is
/// only constructed when [`CacheBuilder::build`] runs, against the final
/// configuration. This trait is sealed and cannot be implemented outside
/// this crate.
#[expect(private_bounds, reason = "intentionally sealed trait pattern")]
pub trait TierSelection<K, V>: Sealed {
    /// The tier this selection produces.
    type Tier: CacheTier<K, V> + 'static;
}

/// Internal trait resolving a selection into its tier.
pub(crate) trait BuildTier<K, V>: TierSelection<K, V> {
    fn build_tier(self, name: CacheName, config: &CacheConfig) -> Self::Tier;
}

/// Selects an in-process moka tier sized from the cache configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct Memory;

/// Selects a shared tier that wraps a [`BlobStore`] in the envelope codec.
#[derive(Debug)]
pub struct Enveloped<S>(S);

/// Selects a caller-supplied tier, used as-is.
#[derive(Debug)]
pub struct Tiered<T>(T);

impl Sealed for Memory {}

impl<K, V> TierSelection<K, V> for Memory
where
    K: Clone + Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    type Tier = InMemoryTier<K, V>;
}

impl<K, V> BuildTier<K, V> for Memory
where
    K: Clone + Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn build_tier(self, name: CacheName, config: &CacheConfig) -> Self::Tier {
        InMemoryTier::builder().time_to_live(config.local_ttl).name(name).build()
    }
}

impl<S> Sealed for Enveloped<S> {}

impl<K, V, S> TierSelection<K, V> for Enveloped<S>
where
    K: AsRef<str> + Send + Sync,
    V: Shaped + Clone + Send + Sync + 'static,
    S: BlobStore + 'static,
{
    type Tier = EnvelopeTier<V, S>;
}

impl<K, V, S> BuildTier<K, V> for Enveloped<S>
where
    K: AsRef<str> + Send + Sync,
    V: Shaped + Clone + Send + Sync + 'static,
    S: BlobStore + 'static,
{
    fn build_tier(self, _name: CacheName, config: &CacheConfig) -> Self::Tier {
        EnvelopeTier::new(self.0, config.shared_ttl, config.fingerprint_width)
    }
}

impl<T> Sealed for Tiered<T> {}

impl<K, V, T> TierSelection<K, V> for Tiered<T>
where
    T: CacheTier<K, V> + 'static,
{
    type Tier = T;
}

impl<K, V, T> BuildTier<K, V> for Tiered<T>
where
    T: CacheTier<K, V> + 'static,
{
    fn build_tier(self, _name: CacheName, _config: &CacheConfig) -> Self::Tier {
        self.0
    }
}

impl Sealed for NullTier {}

impl<K, V> TierSelection<K, V> for NullTier
where
    K: Sync,
    V: Send,
{
    type Tier = NullTier;
}

impl<K, V> BuildTier<K, V> for NullTier
where
    K: Sync,
    V: Send,
{
    fn build_tier(self, _name: CacheName, _config: &CacheConfig) -> Self::Tier {
        self
    }
}

/// Builder for a [`Cache`].
///
/// Created by [`Cache::builder`]. The local and shared tiers are selected by
/// type-state: `memory()` or `local()` picks the local tier, `remote()` or
/// `remote_tier()` picks the shared one. A cache without a shared tier runs
/// local-only against a [`NullTier`].
///
/// Tier selections are resolved against the configuration only when
/// [`build`](Self::build) runs, so `config` and the tier methods can be
/// called in any order.
///
/// # Examples
///
/// ```
/// use hamr::{Cache, CacheConfig};
/// use std::time::Duration;
///
/// let cache = Cache::builder::<String, i32>()
///     .memory()
///     .config(CacheConfig::new().local_ttl(Duration::from_secs(30)))
///     .build();
/// ```
#[derive(Debug)]
pub struct CacheBuilder<K, V, L = (), R = NullTier> {
    name: CacheName,
    config: CacheConfig,
    local: L,
    remote: R,
    _phantom: PhantomData<(K, V)>,
}

impl<K, V> CacheBuilder<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            name: "hamr",
            config: CacheConfig::default(),
            local: (),
            remote: NullTier,
            _phantom: PhantomData,
        }
    }
}

impl<K, V, L, R> CacheBuilder<K, V, L, R> {
    /// Names the cache for log output.
    #[must_use]
    pub fn name(mut self, name: CacheName) -> Self {
        self.name = name;
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses an in-process moka tier as the local tier, built with the
    /// configured local TTL.
    #[must_use]
    pub fn memory(self) -> CacheBuilder<K, V, Memory, R> {
        CacheBuilder {
            name: self.name,
            config: self.config,
            local: Memory,
            remote: self.remote,
            _phantom: PhantomData,
        }
    }

    /// Uses `tier` as the local tier.
    pub fn local<L2>(self, tier: L2) -> CacheBuilder<K, V, Tiered<L2>, R>
    where
        L2: CacheTier<K, V>,
    {
        CacheBuilder {
            name: self.name,
            config: self.config,
            local: Tiered(tier),
            remote: self.remote,
            _phantom: PhantomData,
        }
    }

    /// Uses `store` as the shared tier, wrapped in the fingerprint-prefixed
    /// envelope codec with the configured shared TTL and width.
    pub fn remote<S>(self, store: S) -> CacheBuilder<K, V, L, Enveloped<S>>
    where
        S: BlobStore,
    {
        CacheBuilder {
            name: self.name,
            config: self.config,
            local: self.local,
            remote: Enveloped(store),
            _phantom: PhantomData,
        }
    }

    /// Uses `tier` as the shared tier directly, bypassing the envelope codec.
    ///
    /// Only safe when the tier does its own schema versioning, or when every
    /// process sharing it is guaranteed to run the same shape version.
    pub fn remote_tier<R2>(self, tier: R2) -> CacheBuilder<K, V, L, Tiered<R2>>
    where
        R2: CacheTier<K, V>,
    {
        CacheBuilder {
            name: self.name,
            config: self.config,
            local: self.local,
            remote: Tiered(tier),
            _phantom: PhantomData,
        }
    }
}

#[expect(private_bounds, reason = "BuildTier is an internal trait")]
impl<K, V, L, R> CacheBuilder<K, V, L, R>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    L: BuildTier<K, V>,
    R: BuildTier<K, V>,
{
    /// Resolves the tier selections against the configuration and builds the
    /// cache.
    #[must_use]
    pub fn build(self) -> Cache<K, V, L::Tier, R::Tier> {
        let local = self.local.build_tier(self.name, &self.config);
        let remote = self.remote.build_tier(self.name, &self.config);
        Cache::new(self.name, local, remote, self.config)
    }
}
