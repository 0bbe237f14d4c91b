// Copyright (c) the Hamr Project Authors.
// Licensed under the MIT License.

//! Schema-versioned two-tier caching.
//!
//! `hamr` composes a fast in-process tier and a slower shared tier behind one
//! `get_or_create` call. Values crossing into the shared tier are framed as
//! fingerprint-prefixed envelopes ([`hamr_shape`]), so processes running
//! different versions of a record shape can share one store safely: a blob
//! written by another version reads as a miss, never as garbage.
//!
//! Concurrent misses for the same key are coalesced ([`samflight`]) so the
//! expensive fallback runs once per key, fleet-process-wide.
//!
//! # Example
//!
//! ```
//! use hamr::{Cache, CacheConfig, FieldKind, MemoryBlobStore, ShapeDescriptor, Shaped};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Serialize, Deserialize)]
//! struct BookingRequest {
//!     flight_code: String,
//!     passport_number: String,
//!     seat_preference: String,
//! }
//!
//! impl Shaped for BookingRequest {
//!     fn descriptor() -> ShapeDescriptor {
//!         ShapeDescriptor::of("BookingRequest")
//!             .field("flight_code", FieldKind::Str)
//!             .field("passport_number", FieldKind::Str)
//!             .field("seat_preference", FieldKind::Str)
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), hamr::Error> {
//! let store = MemoryBlobStore::new();
//! let cache = Cache::builder::<String, BookingRequest>()
//!     .name("bookings")
//!     .config(CacheConfig::default())
//!     .memory()
//!     .remote(store)
//!     .build();
//!
//! let entry = cache
//!     .get_or_create(&"booking:VA123:N0123456".to_string(), || async {
//!         Ok::<_, std::io::Error>(BookingRequest {
//!             flight_code: "VA123".to_string(),
//!             passport_number: "N0123456".to_string(),
//!             seat_preference: "window".to_string(),
//!         })
//!     })
//!     .await?;
//! assert_eq!(entry.value().flight_code, "VA123");
//! # Ok(())
//! # }
//! ```

mod builder;
mod cache;
mod config;
mod error;

#[doc(inline)]
pub use builder::{CacheBuilder, Enveloped, Memory, TierSelection, Tiered};
#[doc(inline)]
pub use cache::{Cache, CacheName};
#[doc(inline)]
pub use config::CacheConfig;
#[doc(inline)]
pub use error::{Error, Result};

pub use hamr_memory::InMemoryTier;
pub use hamr_remote::{BlobStore, EnvelopeTier, MemoryBlobStore};
pub use hamr_shape::{FieldKind, Fingerprint, FingerprintWidth, ShapeDescriptor, Shaped};
pub use hamr_tier::{CacheEntry, CacheTier, NullTier};
