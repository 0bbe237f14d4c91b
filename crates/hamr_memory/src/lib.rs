// Copyright (c) the Hamr Project Authors.
// Licensed under the MIT License.

//! In-process local tier backed by moka.
//!
//! The local tier is the fast half of the two-tier cache: lock-free concurrent
//! reads, atomic replacement on write, and a short TTL so that staleness
//! windows after a shape change or a data correction stay small.
//!
//! # Example
//!
//! ```
//! use hamr_memory::InMemoryTier;
//! use hamr_tier::{CacheEntry, CacheTier};
//! use std::time::Duration;
//! # futures::executor::block_on(async {
//!
//! let tier = InMemoryTier::<String, i32>::builder()
//!     .max_capacity(10_000)
//!     .time_to_live(Duration::from_secs(60))
//!     .build();
//!
//! tier.insert(&"key".to_string(), CacheEntry::new(42)).await?;
//! let value = tier.get(&"key".to_string()).await?;
//! assert_eq!(*value.unwrap().value(), 42);
//! # Ok::<(), hamr_tier::Error>(())
//! # });
//! ```

mod builder;
mod tier;

#[doc(inline)]
pub use builder::InMemoryTierBuilder;
#[doc(inline)]
pub use tier::InMemoryTier;
