//! Error types for abibridge

use thiserror::Error;

use crate::{Direction, Side, StructVersionKey};

/// Core bridge errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    // Conversion errors
    #[error("Buffer too short: expected {expected}, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },

    // Layout errors
    #[error("Invalid packing: {0} is not a power of two")]
    InvalidPacking(usize),

    #[error("Layout for {0} declares no fields")]
    EmptyLayout(StructVersionKey),

    #[error("Layout mismatch for {key} ({side}): expected {expected} bytes, computed {actual}")]
    LayoutMismatch {
        key: StructVersionKey,
        side: Side,
        expected: usize,
        actual: usize,
    },

    #[error("Field {field} of {key} ({side}): expected offset {expected}, computed {actual}")]
    OffsetMismatch {
        key: StructVersionKey,
        side: Side,
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("{key} has no field {field}")]
    UnknownField { key: StructVersionKey, field: String },

    // Registry errors
    #[error("Duplicate registration: {0}")]
    DuplicateRegistration(StructVersionKey),

    #[error("Unknown struct: {0}@{1}")]
    UnknownStruct(String, u32),

    #[error("{key} is not registered as a {expected}")]
    WrongKind {
        key: StructVersionKey,
        expected: &'static str,
    },

    #[error("Direction {direction} not available for {key}")]
    DirectionUnavailable {
        key: StructVersionKey,
        direction: Direction,
    },
}

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;
