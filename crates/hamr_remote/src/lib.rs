// Copyright (c) the Hamr Project Authors.
// Licensed under the MIT License.

//! Shared tier for the hamr cache.
//!
//! The shared tier stores values as opaque blobs in an external store (Redis,
//! memcached, a distributed cache service) that many processes read and write
//! concurrently, possibly while running different versions of the code. That
//! is where schema safety matters: [`EnvelopeTier`] wraps any [`BlobStore`]
//! and speaks the fingerprint-prefixed envelope format from [`hamr_shape`], so
//! a blob written by a different shape version degrades to a cache miss
//! instead of deserializing into garbage.
//!
//! Only [`MemoryBlobStore`] ships in this crate; production deployments
//! implement [`BlobStore`] over their transport of choice.

mod envelope_tier;
mod memory_store;
mod store;

#[doc(inline)]
pub use envelope_tier::EnvelopeTier;
#[doc(inline)]
pub use memory_store::MemoryBlobStore;
#[doc(inline)]
pub use store::BlobStore;
