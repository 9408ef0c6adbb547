//! Computed struct layouts
//!
//! A `StructLayout` is a descriptor resolved against one packing rule:
//! the byte offset, size and alignment of every field, plus the padded
//! struct size. Nested fields carry the nested struct's own layout.

use std::ops::Range;

use abibridge_core::{BridgeError, BridgeResult, StructVersionKey};

use crate::{FieldKind, LayoutDescriptor, PackingRule};

/// Round `offset` up to a multiple of `align` (a power of two)
#[inline]
pub fn align_up(offset: usize, align: usize) -> usize {
    (offset + align - 1) & !(align - 1)
}

/// Placement of one field
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSlot {
    pub name: &'static str,
    pub kind: FieldKind,
    pub offset: usize,
    pub size: usize,
    pub align: usize,
    /// Layout of the embedded struct for nested fields
    pub nested: Option<Box<StructLayout>>,
}

impl FieldSlot {
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.size
    }
}

/// A descriptor laid out under one packing rule
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructLayout {
    pub key: StructVersionKey,
    pub rule: PackingRule,
    pub size: usize,
    pub align: usize,
    pub slots: Vec<FieldSlot>,
}

impl StructLayout {
    pub fn compute(descriptor: &LayoutDescriptor, rule: PackingRule) -> BridgeResult<Self> {
        rule.validate()?;
        if descriptor.is_empty() {
            return Err(BridgeError::EmptyLayout(descriptor.key));
        }

        let mut offset = 0;
        let mut struct_align = 1;
        let mut slots = Vec::with_capacity(descriptor.len());

        for field in descriptor.fields {
            let (size, align, nested) = match field.kind {
                FieldKind::Nested(inner) => {
                    let inner = StructLayout::compute(inner, rule)?;
                    (inner.size, rule.cap(inner.align), Some(Box::new(inner)))
                }
                kind => {
                    // Leaf kinds always have a size and an alignment
                    let size = kind.leaf_size().unwrap_or(0);
                    let align = rule.leaf_align(kind).unwrap_or(1);
                    (size, align, None)
                }
            };

            offset = align_up(offset, align);
            slots.push(FieldSlot {
                name: field.name,
                kind: field.kind,
                offset,
                size,
                align,
                nested,
            });
            offset += size;
            struct_align = struct_align.max(align);
        }

        Ok(StructLayout {
            key: descriptor.key,
            rule,
            size: align_up(offset, struct_align),
            align: struct_align,
            slots,
        })
    }

    pub fn slot(&self, name: &str) -> Option<&FieldSlot> {
        self.slots.iter().find(|s| s.name == name)
    }

    /// Resolve a dotted path such as `m_NetAdr.m_unIP`
    /// Returns the absolute byte range within the outer struct
    pub fn field_range(&self, path: &str) -> Option<Range<usize>> {
        let mut layout = self;
        let mut base = 0;
        let mut parts = path.split('.').peekable();

        while let Some(part) = parts.next() {
            let slot = layout.slot(part)?;
            if parts.peek().is_none() {
                let start = base + slot.offset;
                return Some(start..start + slot.size);
            }
            base += slot.offset;
            layout = slot.nested.as_deref()?;
        }

        None
    }

    /// Every leaf field as (dotted path, absolute range), in declared order
    pub fn leaves(&self) -> Vec<(String, FieldKind, Range<usize>)> {
        let mut out = Vec::new();
        self.collect_leaves("", 0, &mut out);
        out
    }

    fn collect_leaves(
        &self,
        prefix: &str,
        base: usize,
        out: &mut Vec<(String, FieldKind, Range<usize>)>,
    ) {
        for slot in &self.slots {
            let path = if prefix.is_empty() {
                slot.name.to_string()
            } else {
                format!("{}.{}", prefix, slot.name)
            };
            match slot.nested.as_deref() {
                Some(inner) => inner.collect_leaves(&path, base + slot.offset, out),
                None => {
                    let start = base + slot.offset;
                    out.push((path, slot.kind, start..start + slot.size));
                }
            }
        }
    }

    /// Bytes not covered by any field
    pub fn padding(&self) -> usize {
        self.size
            - self
                .leaves()
                .iter()
                .map(|(_, _, range)| range.len())
                .sum::<usize>()
    }
}
