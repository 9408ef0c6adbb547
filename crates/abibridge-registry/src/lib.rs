//! abibridge Registry - Converter lookup by (type, version, direction)
//!
//! Converters are registered during an explicit initialization phase on a
//! `RegistryBuilder`. `build()` lays out every descriptor, checks the
//! asserted sizes and freezes the result into an immutable `Registry`
//! that dispatchers share (typically as `Arc<Registry>`).

pub mod builder;
pub mod registry;

pub use builder::*;
pub use registry::*;
