//! Packing rules
//!
//! The foreign side packs structs with a fixed `pack(8)`: every field is
//! aligned to the smaller of its natural size and the pack value. The
//! native side uses the host C layout, so alignment comes from the host's
//! own primitive types. On 32-bit x86 Linux that puts 8-byte fields on
//! 4-byte boundaries while the foreign side keeps them on 8.

use std::mem::{align_of, size_of};

use abibridge_core::{BridgeError, BridgeResult, Side};

use crate::{FieldKind, ScalarWidth};

/// Pack value used by every foreign layout
pub const FOREIGN_PACK: usize = 8;

/// Width of pointer fields; both sides run at the host pointer width
pub const POINTER_SIZE: usize = size_of::<*const u8>();

/// How field offsets are derived for one side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PackingRule {
    /// Natural alignment capped at the pack value
    Packed(usize),
    /// Host `repr(C)` alignment
    Host,
}

impl PackingRule {
    pub fn validate(self) -> BridgeResult<()> {
        match self {
            PackingRule::Packed(n) if n == 0 || !n.is_power_of_two() => {
                Err(BridgeError::InvalidPacking(n))
            }
            _ => Ok(()),
        }
    }

    /// Alignment of a scalar of the given width
    pub fn scalar_align(self, width: ScalarWidth) -> usize {
        match self {
            PackingRule::Packed(n) => width.bytes().min(n),
            PackingRule::Host => match width {
                ScalarWidth::W1 => align_of::<u8>(),
                ScalarWidth::W2 => align_of::<u16>(),
                ScalarWidth::W4 => align_of::<u32>(),
                ScalarWidth::W8 => align_of::<u64>(),
            },
        }
    }

    pub fn pointer_align(self) -> usize {
        match self {
            PackingRule::Packed(n) => POINTER_SIZE.min(n),
            PackingRule::Host => align_of::<*const u8>(),
        }
    }

    /// Cap an aggregate's own alignment
    pub fn cap(self, align: usize) -> usize {
        match self {
            PackingRule::Packed(n) => align.min(n),
            PackingRule::Host => align,
        }
    }

    /// Alignment of a leaf field; `None` for nested structs
    pub fn leaf_align(self, kind: FieldKind) -> Option<usize> {
        match kind {
            FieldKind::Int { width, .. } | FieldKind::Enum(width) | FieldKind::Handle(width) => {
                Some(self.scalar_align(width))
            }
            FieldKind::Bool => Some(self.cap(align_of::<bool>())),
            FieldKind::Bytes(_) => Some(1),
            FieldKind::Pointer => Some(self.pointer_align()),
            FieldKind::Nested(_) => None,
        }
    }
}

/// Packing rules for both sides of the boundary
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutRules {
    pub foreign: PackingRule,
    pub native: PackingRule,
}

impl LayoutRules {
    #[inline]
    pub fn rule(&self, side: Side) -> PackingRule {
        match side {
            Side::Foreign => self.foreign,
            Side::Native => self.native,
        }
    }

    pub fn validate(&self) -> BridgeResult<()> {
        self.foreign.validate()?;
        self.native.validate()
    }
}

impl Default for LayoutRules {
    fn default() -> Self {
        LayoutRules {
            foreign: PackingRule::Packed(FOREIGN_PACK),
            native: PackingRule::Host,
        }
    }
}
