// Copyright (c) the Hamr Project Authors.
// Licensed under the MIT License.

//! Structural descriptions of cacheable record types.

/// Type tag for a single field of a cacheable record.
///
/// The tag set is deliberately coarse: it identifies binary layout classes,
/// not semantic types. Two fields with the same tag encode the same way, so
/// retagging a field always changes the shape fingerprint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// A boolean.
    Bool,
    /// A signed 64-bit integer.
    I64,
    /// An unsigned 64-bit integer.
    U64,
    /// A 64-bit float.
    F64,
    /// A UTF-8 string.
    Str,
    /// An opaque byte sequence.
    Bytes,
    /// An optional value of the inner kind.
    Option(Box<FieldKind>),
    /// A homogeneous sequence of the inner kind.
    Seq(Box<FieldKind>),
    /// A nested record with its own ordered fields.
    Record(Vec<Field>),
}

impl FieldKind {
    /// Appends the canonical tag encoding of this kind to `out`.
    ///
    /// Single byte per kind; composite kinds recurse into their inner
    /// structure so that `Seq<Str>` and `Seq<I64>` encode differently.
    fn write_canonical(&self, out: &mut Vec<u8>) {
        match self {
            Self::Bool => out.push(0x01),
            Self::I64 => out.push(0x02),
            Self::U64 => out.push(0x03),
            Self::F64 => out.push(0x04),
            Self::Str => out.push(0x05),
            Self::Bytes => out.push(0x06),
            Self::Option(inner) => {
                out.push(0x07);
                inner.write_canonical(out);
            }
            Self::Seq(inner) => {
                out.push(0x08);
                inner.write_canonical(out);
            }
            Self::Record(fields) => {
                out.push(0x09);
                out.extend_from_slice(&u32::try_from(fields.len()).unwrap_or(u32::MAX).to_le_bytes());
                for field in fields {
                    field.write_canonical(out);
                }
            }
        }
    }
}

/// A single named, typed field of a record shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    name: &'static str,
    kind: FieldKind,
}

impl Field {
    /// Creates a field with the given name and type tag.
    #[must_use]
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }

    /// Returns the field's name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the field's type tag.
    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    fn write_canonical(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&u32::try_from(self.name.len()).unwrap_or(u32::MAX).to_le_bytes());
        out.extend_from_slice(self.name.as_bytes());
        self.kind.write_canonical(out);
    }
}

/// An ordered description of one cacheable record type.
///
/// Field order is declaration order and is part of the canonical encoding:
/// reordering fields produces a different fingerprint. The type name is kept
/// for diagnostics only and is not hashed, so renaming a type without touching
/// its fields keeps its cached entries valid.
///
/// # Examples
///
/// ```
/// use hamr_shape::{FieldKind, ShapeDescriptor};
///
/// let shape = ShapeDescriptor::of("BookingRequest")
///     .field("flight_code", FieldKind::Str)
///     .field("passport_number", FieldKind::Str)
///     .field("seat_preference", FieldKind::Str);
///
/// assert_eq!(shape.fields().len(), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShapeDescriptor {
    type_name: &'static str,
    fields: Vec<Field>,
}

impl ShapeDescriptor {
    /// Starts a descriptor for the named record type.
    #[must_use]
    pub fn of(type_name: &'static str) -> Self {
        Self {
            type_name,
            fields: Vec::new(),
        }
    }

    /// Appends a field, preserving declaration order.
    #[must_use]
    pub fn field(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(Field::new(name, kind));
        self
    }

    /// Returns the diagnostic type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the canonical byte encoding that the fingerprint hashes.
    ///
    /// Per field, in declaration order: name length (u32 LE), name bytes,
    /// recursive kind tags. The type name is intentionally absent.
    #[must_use]
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.fields.len() * 16);
        for field in &self.fields {
            field.write_canonical(&mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_bytes_cover_name_and_kind() {
        let shape = ShapeDescriptor::of("T").field("id", FieldKind::U64);
        let bytes = shape.canonical_bytes();
        // 4 bytes length + 2 bytes name + 1 byte tag
        assert_eq!(bytes.len(), 7);
        assert_eq!(&bytes[..4], &2u32.to_le_bytes());
        assert_eq!(&bytes[4..6], b"id");
        assert_eq!(bytes[6], 0x03);
    }

    #[test]
    fn type_name_is_not_part_of_canonical_bytes() {
        let a = ShapeDescriptor::of("A").field("x", FieldKind::Str);
        let b = ShapeDescriptor::of("B").field("x", FieldKind::Str);
        assert_eq!(a.canonical_bytes(), b.canonical_bytes());
    }

    #[test]
    fn nested_kinds_encode_recursively() {
        let plain = ShapeDescriptor::of("T").field("xs", FieldKind::Seq(Box::new(FieldKind::Str)));
        let nested = ShapeDescriptor::of("T").field("xs", FieldKind::Seq(Box::new(FieldKind::I64)));
        assert_ne!(plain.canonical_bytes(), nested.canonical_bytes());
    }

    #[test]
    fn field_order_changes_canonical_bytes() {
        let ab = ShapeDescriptor::of("T").field("a", FieldKind::Str).field("b", FieldKind::Str);
        let ba = ShapeDescriptor::of("T").field("b", FieldKind::Str).field("a", FieldKind::Str);
        assert_ne!(ab.canonical_bytes(), ba.canonical_bytes());
    }
}
