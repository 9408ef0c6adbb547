//! Field transcription
//!
//! Both sides share endianness and every field has the same width on both
//! sides, so copying a scalar, a bool, an enum, a handle, a pointer or a
//! fixed array is the same operation: move exactly `len` bytes from the
//! source offset to the destination offset. Nothing is interpreted, so
//! handle bit patterns and unterminated arrays survive unchanged.

use abibridge_core::Direction;

/// Copy of one leaf field between the two layouts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldCopy {
    pub name: &'static str,
    /// Offset in the foreign layout
    pub foreign: usize,
    /// Offset in the native layout
    pub native: usize,
    pub len: usize,
}

impl FieldCopy {
    /// (source offset, destination offset) for a direction
    #[inline]
    pub fn offsets(&self, direction: Direction) -> (usize, usize) {
        match direction {
            Direction::ForeignToNative => (self.foreign, self.native),
            Direction::NativeToForeign => (self.native, self.foreign),
        }
    }

    /// Caller guarantees both buffers cover the field
    #[inline]
    pub fn apply(&self, direction: Direction, src: &[u8], dst: &mut [u8]) {
        let (from, to) = self.offsets(direction);
        transcribe_bytes(&src[from..from + self.len], &mut dst[to..to + self.len]);
    }
}

/// Byte-exact copy of one field
#[inline]
pub fn transcribe_bytes(src: &[u8], dst: &mut [u8]) {
    dst.copy_from_slice(src);
}
