//! abibridge Test Harness - Conversion validation over registered layouts
//!
//! This crate provides:
//! - Random fill of a layout's fields (padding untouched)
//! - Field inspection by dotted path
//! - Transcription and round-trip checks
//! - A seeded fuzzer over a whole registry

pub mod fill;
pub mod fuzzer;
pub mod inspect;

pub use fill::*;
pub use fuzzer::*;
pub use inspect::*;
