// Copyright (c) the Hamr Project Authors.
// Licensed under the MIT License.

//! Core cache tier abstractions for building cache backends.
//!
//! This crate defines the [`CacheTier`] trait that all cache tiers must satisfy,
//! along with [`CacheEntry`] for storing values with metadata and [`Error`] for
//! fallible operations.
//!
//! # Overview
//!
//! The tier abstraction separates storage concerns from caching policy. Implement
//! [`CacheTier`] for your storage backend, then use `hamr` to add schema-safe
//! envelopes, TTL, two-tier fallthrough, and miss coalescing on top.
//!
//! # Implementing a Cache Tier
//!
//! ```
//! use hamr_tier::{CacheEntry, CacheTier, Error};
//! use std::collections::HashMap;
//! use std::sync::RwLock;
//!
//! struct SimpleTier<K, V>(RwLock<HashMap<K, CacheEntry<V>>>);
//!
//! impl<K, V> CacheTier<K, V> for SimpleTier<K, V>
//! where
//!     K: Clone + Eq + std::hash::Hash + Send + Sync,
//!     V: Clone + Send + Sync,
//! {
//!     async fn get(&self, key: &K) -> Result<Option<CacheEntry<V>>, Error> {
//!         Ok(self.0.read().map_err(|_| Error::from_message("lock poisoned"))?.get(key).cloned())
//!     }
//!
//!     async fn insert(&self, key: &K, entry: CacheEntry<V>) -> Result<(), Error> {
//!         self.0.write().map_err(|_| Error::from_message("lock poisoned"))?.insert(key.clone(), entry);
//!         Ok(())
//!     }
//!
//!     async fn invalidate(&self, key: &K) -> Result<(), Error> {
//!         self.0.write().map_err(|_| Error::from_message("lock poisoned"))?.remove(key);
//!         Ok(())
//!     }
//!
//!     async fn clear(&self) -> Result<(), Error> {
//!         self.0.write().map_err(|_| Error::from_message("lock poisoned"))?.clear();
//!         Ok(())
//!     }
//! }
//! ```

mod entry;
pub mod error;
mod null;
#[cfg(any(feature = "test-util", test))]
pub mod testing;
pub(crate) mod tier;

#[doc(inline)]
pub use entry::CacheEntry;
#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use null::NullTier;
#[doc(inline)]
pub use tier::CacheTier;
