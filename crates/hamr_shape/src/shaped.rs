// Copyright (c) the Hamr Project Authors.
// Licensed under the MIT License.

use serde::{Serialize, de::DeserializeOwned};

use crate::ShapeDescriptor;

/// A record type that can be cached behind a shape fingerprint.
///
/// Implementors supply an explicit field list describing their binary shape;
/// no reflection and no per-type code generation. The descriptor is consulted
/// once, when a cache is constructed for the type, and the resulting
/// fingerprint travels with every encoded value.
///
/// Keep the descriptor honest: it must list the serialized fields in
/// declaration order. A descriptor that drifts from the actual struct defeats
/// the schema-change detection it exists to provide.
///
/// # Examples
///
/// ```
/// use hamr_shape::{FieldKind, ShapeDescriptor, Shaped};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Serialize, Deserialize)]
/// struct FlightManifest {
///     flight_id: String,
///     destination: String,
/// }
///
/// impl Shaped for FlightManifest {
///     fn descriptor() -> ShapeDescriptor {
///         ShapeDescriptor::of("FlightManifest")
///             .field("flight_id", FieldKind::Str)
///             .field("destination", FieldKind::Str)
///     }
/// }
/// ```
pub trait Shaped: Serialize + DeserializeOwned {
    /// Returns the structural description of this type's fields.
    fn descriptor() -> ShapeDescriptor;
}
