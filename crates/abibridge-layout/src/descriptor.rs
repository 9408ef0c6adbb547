//! Layout descriptors
//!
//! A descriptor is the authoritative field list of one struct at one API
//! version: names, kinds and declared order. Offsets are not stored here;
//! they are computed per side from the packing rule (see `layout`).
//!
//! Descriptors are declared as `static` items so nested fields can point
//! at the nested type's own descriptor instead of repeating its fields.

use abibridge_core::StructVersionKey;

use crate::POINTER_SIZE;

/// Width of a fixed-size integer field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ScalarWidth {
    W1 = 1,
    W2 = 2,
    W4 = 4,
    W8 = 8,
}

impl ScalarWidth {
    #[inline]
    pub const fn bytes(self) -> usize {
        self as usize
    }
}

/// Semantic kind of a field
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Integer of a fixed width; signedness is informational only
    Int { width: ScalarWidth, signed: bool },
    /// One-byte boolean, copied without normalisation
    Bool,
    /// Enum stored as a fixed-width integer, no range check
    Enum(ScalarWidth),
    /// Fixed-length character/byte array, same length on both sides
    Bytes(usize),
    /// Opaque handle of a fixed width
    Handle(ScalarWidth),
    /// Opaque pointer-sized value, never dereferenced
    Pointer,
    /// Embedded struct with its own descriptor
    Nested(&'static LayoutDescriptor),
}

impl FieldKind {
    /// Size in bytes for leaf kinds; nested sizes depend on the packing rule
    pub fn leaf_size(self) -> Option<usize> {
        match self {
            FieldKind::Int { width, .. } | FieldKind::Enum(width) | FieldKind::Handle(width) => {
                Some(width.bytes())
            }
            FieldKind::Bool => Some(1),
            FieldKind::Bytes(len) => Some(len),
            FieldKind::Pointer => Some(POINTER_SIZE),
            FieldKind::Nested(_) => None,
        }
    }

    /// Handle and pointer fields are opaque bit patterns
    #[inline]
    pub fn is_opaque(self) -> bool {
        matches!(self, FieldKind::Handle(_) | FieldKind::Pointer)
    }
}

/// One declared field
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        FieldSpec { name, kind }
    }

    pub const fn int(name: &'static str, width: ScalarWidth, signed: bool) -> Self {
        Self::new(name, FieldKind::Int { width, signed })
    }

    pub const fn i16(name: &'static str) -> Self {
        Self::int(name, ScalarWidth::W2, true)
    }

    pub const fn u16(name: &'static str) -> Self {
        Self::int(name, ScalarWidth::W2, false)
    }

    pub const fn i32(name: &'static str) -> Self {
        Self::int(name, ScalarWidth::W4, true)
    }

    pub const fn u32(name: &'static str) -> Self {
        Self::int(name, ScalarWidth::W4, false)
    }

    pub const fn i64(name: &'static str) -> Self {
        Self::int(name, ScalarWidth::W8, true)
    }

    pub const fn u64(name: &'static str) -> Self {
        Self::int(name, ScalarWidth::W8, false)
    }

    pub const fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldKind::Bool)
    }

    pub const fn enumeration(name: &'static str, width: ScalarWidth) -> Self {
        Self::new(name, FieldKind::Enum(width))
    }

    pub const fn bytes(name: &'static str, len: usize) -> Self {
        Self::new(name, FieldKind::Bytes(len))
    }

    pub const fn handle(name: &'static str, width: ScalarWidth) -> Self {
        Self::new(name, FieldKind::Handle(width))
    }

    pub const fn pointer(name: &'static str) -> Self {
        Self::new(name, FieldKind::Pointer)
    }

    pub const fn nested(name: &'static str, descriptor: &'static LayoutDescriptor) -> Self {
        Self::new(name, FieldKind::Nested(descriptor))
    }
}

/// Ordered field list for one struct version
#[derive(Debug, PartialEq, Eq)]
pub struct LayoutDescriptor {
    pub key: StructVersionKey,
    pub fields: &'static [FieldSpec],
}

impl LayoutDescriptor {
    pub const fn new(name: &'static str, version: u32, fields: &'static [FieldSpec]) -> Self {
        LayoutDescriptor {
            key: StructVersionKey::new(name, version),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Descriptors referenced directly by nested fields
    pub fn nested(&self) -> impl Iterator<Item = &'static LayoutDescriptor> + '_ {
        self.fields.iter().filter_map(|f| match f.kind {
            FieldKind::Nested(inner) => Some(inner),
            _ => None,
        })
    }
}
