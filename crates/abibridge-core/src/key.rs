//! Identity types for struct conversion
//!
//! A struct is identified by its API type name plus the SDK release that
//! fixed its shape. Conversion runs in one of two directions between the
//! foreign (pack(8)) layout and the native (host) layout.

use std::fmt;

/// Identifies exactly one layout descriptor and one converter
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructVersionKey {
    /// API type name, e.g. `gameserveritem_t`
    pub name: &'static str,
    /// SDK release the shape belongs to
    pub version: u32,
}

impl StructVersionKey {
    #[inline]
    pub const fn new(name: &'static str, version: u32) -> Self {
        StructVersionKey { name, version }
    }

    /// Check against a borrowed name, e.g. one decoded from a C string
    #[inline]
    pub fn matches(&self, name: &str, version: u32) -> bool {
        self.version == version && self.name == name
    }
}

impl fmt::Debug for StructVersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Struct({}@{})", self.name, self.version)
    }
}

impl fmt::Display for StructVersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// Which of the two buffers a layout describes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Layout dictated by the calling side (fixed packing)
    Foreign,
    /// Host compiler layout
    Native,
}

impl Side {
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Side::Foreign => Side::Native,
            Side::Native => Side::Foreign,
        }
    }

    /// Parse from wire byte
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(Side::Foreign),
            1 => Some(Side::Native),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Foreign => f.write_str("foreign"),
            Side::Native => f.write_str("native"),
        }
    }
}

/// Conversion direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    /// Foreign layout in, native layout out (call arguments)
    ForeignToNative = 0,
    /// Native layout in, foreign layout out (results, callbacks)
    NativeToForeign = 1,
}

impl Direction {
    /// Parse from wire byte
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(Direction::ForeignToNative),
            1 => Some(Direction::NativeToForeign),
            _ => None,
        }
    }

    /// Convert to wire byte
    #[inline]
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn reverse(self) -> Self {
        match self {
            Direction::ForeignToNative => Direction::NativeToForeign,
            Direction::NativeToForeign => Direction::ForeignToNative,
        }
    }

    /// Side the source buffer is laid out for
    #[inline]
    pub fn source(self) -> Side {
        match self {
            Direction::ForeignToNative => Side::Foreign,
            Direction::NativeToForeign => Side::Native,
        }
    }

    /// Side the destination buffer is laid out for
    #[inline]
    pub fn destination(self) -> Side {
        self.source().other()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.source(), self.destination())
    }
}
