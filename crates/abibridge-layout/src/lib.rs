//! abibridge Layout - Struct layout conversion engine
//!
//! This crate implements the conversion machinery:
//! - Layout descriptors (field names, kinds, order)
//! - Packing rules (foreign pack(8), host repr(C))
//! - Field transcription and converter pairs
//! - One-directional callback transcribers

pub mod callback;
pub mod convert;
pub mod descriptor;
pub mod layout;
pub mod rules;
pub mod transcribe;

pub use callback::*;
pub use convert::*;
pub use descriptor::*;
pub use layout::*;
pub use rules::*;
pub use transcribe::*;
