// Copyright (c) the Hamr Project Authors.
// Licensed under the MIT License.

//! The main cache type with coalesced population.

use std::{fmt::Debug, hash::Hash, sync::Arc};

use samflight::SamFlight;
use tracing::{debug, warn};

use crate::{CacheConfig, Error, builder::CacheBuilder};
use hamr_tier::{CacheEntry, CacheTier};

/// Type alias for cache names used in log output.
pub type CacheName = &'static str;

/// A two-tier cache with coalesced population.
///
/// Reads check the fast local tier first, then the shared tier, then — for
/// [`get_or_create`](Self::get_or_create) — the caller's fallback computation.
/// Concurrent misses for the same key are coalesced so the shared-tier lookup
/// and the fallback run once, and every waiter shares the outcome.
///
/// Availability over strictness: a shared tier that is down or holds
/// unreadable blobs degrades reads to misses and never blocks population.
/// Only the fallback computation itself failing surfaces as an error.
///
/// # Examples
///
/// ```
/// use hamr::{Cache, CacheEntry};
/// # futures::executor::block_on(async {
///
/// let cache = Cache::builder::<String, i32>().memory().build();
///
/// cache.insert(&"key".to_string(), CacheEntry::new(42)).await?;
/// let value = cache.get(&"key".to_string()).await?;
/// assert_eq!(*value.unwrap().value(), 42);
/// # Ok::<(), hamr::Error>(())
/// # });
/// ```
pub struct Cache<K, V, L, R> {
    name: CacheName,
    local: Arc<L>,
    remote: Arc<R>,
    flights: SamFlight<K, Result<CacheEntry<V>, Error>>,
    config: CacheConfig,
}

impl<K, V, L, R> Debug for Cache<K, V, L, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache").field("name", &self.name).field("config", &self.config).finish_non_exhaustive()
    }
}

impl Cache<(), (), (), ()> {
    /// Creates a new cache builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use hamr::Cache;
    ///
    /// let cache = Cache::builder::<String, i32>().memory().build();
    /// ```
    #[must_use]
    pub fn builder<K, V>() -> CacheBuilder<K, V> {
        CacheBuilder::new()
    }
}

impl<K, V, L, R> Cache<K, V, L, R>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(name: CacheName, local: L, remote: R, config: CacheConfig) -> Self {
        Self {
            name,
            local: Arc::new(local),
            remote: Arc::new(remote),
            flights: SamFlight::new(),
            config,
        }
    }

    /// Returns the name of this cache, as it appears in log output.
    #[must_use]
    pub fn name(&self) -> CacheName {
        self.name
    }

    /// Returns the cache's configuration.
    #[must_use]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns a reference to the local tier.
    #[must_use]
    pub fn local(&self) -> &L {
        &self.local
    }

    /// Returns a reference to the shared tier.
    #[must_use]
    pub fn remote(&self) -> &R {
        &self.remote
    }
}

impl<K, V, L, R> Cache<K, V, L, R>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    L: CacheTier<K, V> + Send + Sync + 'static,
    R: CacheTier<K, V> + Send + Sync + 'static,
{
    /// Retrieves a value, checking the local tier and then the shared tier.
    ///
    /// A shared-tier hit is promoted into the local tier so the next read is
    /// local. Returns `None` if neither tier holds a live entry — including
    /// when the shared tier holds a blob written by a different shape version,
    /// and when the shared tier cannot be reached at all. Shared-tier read
    /// failures are logged and reported as a miss, the same posture
    /// [`get_or_create`](Self::get_or_create) takes.
    ///
    /// # Errors
    ///
    /// Returns an error if the local tier fails; that tier is this process's
    /// own storage, not a remote dependency.
    pub async fn get(&self, key: &K) -> Result<Option<CacheEntry<V>>, Error> {
        if let Some(entry) = self.local.get(key).await? {
            return Ok(Some(entry));
        }
        let entry = match self.remote.get(key).await {
            Ok(Some(entry)) => entry,
            Ok(None) => return Ok(None),
            Err(error) => {
                debug!(cache = self.name, %error, "shared tier read failed, treating as miss");
                return Ok(None);
            }
        };
        if let Err(error) = self.local.insert(key, entry.clone()).await {
            warn!(cache = self.name, %error, "failed to promote entry to local tier");
        }
        Ok(Some(entry))
    }

    /// Inserts a value into both tiers.
    ///
    /// # Errors
    ///
    /// Returns an error if either tier rejects the write. On a shared-tier
    /// failure the local tier is left untouched, so a reader cannot observe a
    /// value the rest of the fleet never got.
    pub async fn insert(&self, key: &K, entry: CacheEntry<V>) -> Result<(), Error> {
        self.remote.insert(key, entry.clone()).await?;
        self.local.insert(key, entry).await?;
        Ok(())
    }

    /// Removes a value from both tiers.
    ///
    /// The shared tier is cleared first; if that fails, the local copy is
    /// kept too, so this process does not recompute a value the rest of the
    /// fleet still serves.
    ///
    /// # Errors
    ///
    /// Returns an error if either tier operation fails.
    pub async fn invalidate(&self, key: &K) -> Result<(), Error> {
        self.remote.invalidate(key).await?;
        self.local.invalidate(key).await?;
        Ok(())
    }

    /// Returns `true` if either tier holds a live entry for the key.
    ///
    /// # Errors
    ///
    /// Returns an error if a tier operation fails.
    pub async fn contains(&self, key: &K) -> Result<bool, Error> {
        Ok(self.get(key).await?.is_some())
    }

    /// Clears both tiers.
    ///
    /// # Errors
    ///
    /// Returns an error if either tier operation fails.
    pub async fn clear(&self) -> Result<(), Error> {
        self.remote.clear().await?;
        self.local.clear().await?;
        Ok(())
    }

    /// Returns the number of entries in the local tier, if it tracks one.
    #[must_use]
    pub fn len(&self) -> Option<u64> {
        self.local.len()
    }

    /// Returns `true` if the local tier is empty, if it tracks a size.
    #[must_use]
    pub fn is_empty(&self) -> Option<bool> {
        self.local.is_empty()
    }

    /// Retrieves a value, or computes and caches it on a miss.
    ///
    /// Lookup order: local tier, shared tier, then the `create` fallback.
    /// A shared-tier hit is promoted to the local tier; a fallback result is
    /// written to both tiers. Tier read failures degrade to misses and tier
    /// write failures are logged and swallowed — the caller still gets the
    /// value.
    ///
    /// # Coalescing
    ///
    /// Concurrent calls for the same missing key are coalesced: one flight
    /// performs the shared-tier lookup and (if needed) the fallback, and every
    /// caller shares its outcome, errors included. Errors are never cached;
    /// the next call retries. The flight is spawned onto the runtime and runs
    /// to completion even if every waiting caller gives up, so population
    /// work, once started, lands in the cache.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fallback`] if `create` fails, or [`Error::Aborted`]
    /// if the coalesced computation panicked or the runtime shut down.
    ///
    /// # Panics
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Examples
    ///
    /// ```
    /// use hamr::Cache;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> Result<(), hamr::Error> {
    /// let cache = Cache::builder::<String, i32>().memory().build();
    ///
    /// let entry = cache
    ///     .get_or_create(&"key".to_string(), || async { Ok::<_, std::io::Error>(42) })
    ///     .await?;
    /// assert_eq!(*entry.value(), 42);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_or_create<F, Fut, E>(&self, key: &K, create: F) -> Result<CacheEntry<V>, Error>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        match self.local.get(key).await {
            Ok(Some(entry)) => return Ok(entry),
            Ok(None) => {}
            Err(error) => debug!(cache = self.name, %error, "local tier read failed, treating as miss"),
        }

        let name = self.name;
        let local = Arc::clone(&self.local);
        let remote = Arc::clone(&self.remote);
        let flight_key = key.clone();
        self.flights
            .work(key.clone(), move || async move {
                Self::load(name, &flight_key, &local, &remote, create).await
            })
            .await?
    }

    /// The body of a population flight: shared-tier lookup, fallback, and
    /// tier writes. Runs once per coalesced group.
    async fn load<F, Fut, E>(name: CacheName, key: &K, local: &L, remote: &R, create: F) -> Result<CacheEntry<V>, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: std::error::Error + Send + Sync + 'static,
    {
        // A racing flight may have landed between the caller's local miss and
        // this one taking off.
        match local.get(key).await {
            Ok(Some(entry)) => return Ok(entry),
            Ok(None) => {}
            Err(error) => debug!(cache = name, %error, "local tier read failed, treating as miss"),
        }

        match remote.get(key).await {
            Ok(Some(entry)) => {
                if let Err(error) = local.insert(key, entry.clone()).await {
                    warn!(cache = name, %error, "failed to promote entry to local tier");
                }
                return Ok(entry);
            }
            Ok(None) => {}
            Err(error) => debug!(cache = name, %error, "shared tier read failed, treating as miss"),
        }

        let value = create().await.map_err(Error::fallback)?;
        let entry = CacheEntry::new(value);
        if let Err(error) = remote.insert(key, entry.clone()).await {
            warn!(cache = name, %error, "failed to write entry to shared tier");
        }
        if let Err(error) = local.insert(key, entry.clone()).await {
            warn!(cache = name, %error, "failed to write entry to local tier");
        }
        Ok(entry)
    }
}
