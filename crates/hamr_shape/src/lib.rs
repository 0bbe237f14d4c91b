// Copyright (c) the Hamr Project Authors.
// Licensed under the MIT License.

//! Stable shape fingerprints and schema-safe binary envelopes.
//!
//! Cached values are stored as binary blobs, and a binary blob is only as
//! trustworthy as the data shape that produced it: add, remove, or retype a
//! field and yesterday's bytes silently stop matching today's type. This crate
//! detects that drift at read time instead of letting it surface as a
//! deserialization crash.
//!
//! Three pieces work together:
//!
//! - A [`ShapeDescriptor`] lists a record's fields in declaration order, each
//!   with a [`FieldKind`] type tag.
//! - A [`Fingerprint`] is a stable 128-bit hash of that descriptor, identical
//!   across processes and machines for structurally identical shapes.
//! - The [`envelope`] codec prefixes every encoded payload with the
//!   fingerprint, and refuses to decode bytes whose embedded fingerprint does
//!   not match the reader's expectation. A mismatch is reported as
//!   [`envelope::Decoded::SchemaMismatch`], a value rather than an error, so a
//!   shape change degrades to a cache miss.
//!
//! # Example
//!
//! ```
//! use hamr_shape::{envelope, FieldKind, Fingerprint, FingerprintWidth, ShapeDescriptor, Shaped};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
//! struct Booking {
//!     flight_code: String,
//!     seat: String,
//! }
//!
//! impl Shaped for Booking {
//!     fn descriptor() -> ShapeDescriptor {
//!         ShapeDescriptor::of("Booking")
//!             .field("flight_code", FieldKind::Str)
//!             .field("seat", FieldKind::Str)
//!     }
//! }
//!
//! let fp = Fingerprint::of::<Booking>();
//! let booking = Booking { flight_code: "VA123".into(), seat: "Window".into() };
//!
//! let blob = envelope::encode(&booking, fp, FingerprintWidth::W64)?;
//! let decoded = envelope::decode::<Booking>(&blob, fp, FingerprintWidth::W64)?;
//! assert_eq!(decoded, envelope::Decoded::Value(booking));
//! # Ok::<(), hamr_shape::envelope::EnvelopeError>(())
//! ```

mod descriptor;
pub mod envelope;
mod fingerprint;
mod shaped;

#[doc(inline)]
pub use descriptor::{Field, FieldKind, ShapeDescriptor};
#[doc(inline)]
pub use fingerprint::{Fingerprint, FingerprintWidth};
#[doc(inline)]
pub use shaped::Shaped;
