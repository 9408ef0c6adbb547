#![allow(clippy::missing_safety_doc)]
//! Named per-struct entry points
//!
//! One exported symbol per (type, version, direction), called by the
//! dispatcher with raw `(src, dst)` pointers. The caller guarantees both
//! buffers hold the full source and destination size; nothing is checked
//! beyond null pointers.

use std::ffi::c_int;

use abibridge_core::{BridgeError, Direction};
use abibridge_layout::LayoutDescriptor;
use abibridge_registry::Entry;
use abibridge_sdk::*;

use crate::error::*;
use crate::registry;

/// Convert through the registered entry for `descriptor`
///
/// # Safety
/// `src` must be readable for the source size and `dst` writable for the
/// destination size of `descriptor` in `direction`.
pub unsafe fn convert_unchecked(
    descriptor: &'static LayoutDescriptor,
    direction: Direction,
    src: *const u8,
    dst: *mut u8,
) -> AbiResult<()> {
    if src.is_null() || dst.is_null() {
        return Err(AbiErrorCode::InvalidArgument.raise("Null buffer"));
    }

    let registry = registry()?;
    let key = descriptor.key;
    match registry.get(key) {
        Some(Entry::Pair(pair)) => {
            pair.convert_raw(direction, src, dst);
            Ok(())
        }
        Some(Entry::Callback(cb)) if cb.direction() == direction => {
            cb.transcribe_raw(src, dst);
            Ok(())
        }
        Some(Entry::Callback(_)) => {
            Err(report(BridgeError::DirectionUnavailable { key, direction }))
        }
        None => Err(report(BridgeError::UnknownStruct(
            key.name.to_string(),
            key.version,
        ))),
    }
}

macro_rules! pair_entry_points {
    ($descriptor:expr, $foreign_to_native:ident, $native_to_foreign:ident) => {
        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn $foreign_to_native(src: *const u8, dst: *mut u8) -> c_int {
            status(convert_unchecked(
                &$descriptor,
                Direction::ForeignToNative,
                src,
                dst,
            ))
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn $native_to_foreign(src: *const u8, dst: *mut u8) -> c_int {
            status(convert_unchecked(
                &$descriptor,
                Direction::NativeToForeign,
                src,
                dst,
            ))
        }
    };
}

macro_rules! callback_entry_point {
    ($descriptor:expr, $name:ident) => {
        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn $name(src: *const u8, dst: *mut u8) -> c_int {
            status(convert_unchecked(&$descriptor, CALLBACK_DIRECTION, src, dst))
        }
    };
}

pair_entry_points!(
    CALLBACK_MSG_102,
    abibridge_CallbackMsg_t_102_foreign_to_native,
    abibridge_CallbackMsg_t_102_native_to_foreign
);
pair_entry_points!(
    SERVERNETADR_102,
    abibridge_servernetadr_t_102_foreign_to_native,
    abibridge_servernetadr_t_102_native_to_foreign
);
pair_entry_points!(
    GAMESERVERITEM_102,
    abibridge_gameserveritem_t_102_foreign_to_native,
    abibridge_gameserveritem_t_102_native_to_foreign
);

callback_entry_point!(
    REQUEST_FRIENDS_LOBBIES_RESPONSE_24,
    abibridge_RequestFriendsLobbiesResponse_t_24_callback
);
callback_entry_point!(USER_STATS_RECEIVED_12, abibridge_UserStatsReceived_t_12_callback);
