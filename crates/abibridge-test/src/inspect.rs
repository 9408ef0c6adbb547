//! Field inspection and comparison across layouts

use std::ops::Range;

use abibridge_layout::StructLayout;

/// Bytes of the field at `path` ("m_NetAdr.m_unIP" for nested fields)
pub fn read_field<'a>(layout: &StructLayout, buf: &'a [u8], path: &str) -> Option<&'a [u8]> {
    buf.get(layout.field_range(path)?)
}

/// Leaf paths whose bytes differ between two buffers of the same layout
pub fn changed_fields(layout: &StructLayout, before: &[u8], after: &[u8]) -> Vec<String> {
    layout
        .leaves()
        .into_iter()
        .filter(|(_, _, range)| before.get(range.clone()) != after.get(range.clone()))
        .map(|(path, _, _)| path)
        .collect()
}

/// Leaf paths whose value in `dst` differs from `src`, each read through
/// its own layout
pub fn mismatched_fields(
    src_layout: &StructLayout,
    src: &[u8],
    dst_layout: &StructLayout,
    dst: &[u8],
) -> Vec<String> {
    src_layout
        .leaves()
        .into_iter()
        .filter(|(path, _, range)| {
            let theirs = read_field(dst_layout, dst, path);
            theirs.is_none() || src.get(range.clone()) != theirs
        })
        .map(|(path, _, _)| path)
        .collect()
}

/// Byte ranges of `layout` not covered by any leaf, in offset order
pub fn padding_ranges(layout: &StructLayout) -> Vec<Range<usize>> {
    let mut leaves: Vec<_> = layout.leaves().into_iter().map(|(_, _, r)| r).collect();
    leaves.sort_by_key(|r| r.start);

    let mut gaps = Vec::new();
    let mut cursor = 0;
    for range in leaves {
        if range.start > cursor {
            gaps.push(cursor..range.start);
        }
        cursor = cursor.max(range.end);
    }
    if layout.size > cursor {
        gaps.push(cursor..layout.size);
    }
    gaps
}
