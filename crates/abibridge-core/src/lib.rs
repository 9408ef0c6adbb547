//! abibridge Core - Fundamental types
//!
//! This crate defines the identifiers shared by every layer of the bridge:
//! - Struct identity (StructVersionKey)
//! - Conversion direction and buffer side (Direction, Side)
//! - Error types

pub mod error;
pub mod key;

pub use error::*;
pub use key::*;
