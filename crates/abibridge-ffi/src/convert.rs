#![allow(clippy::missing_safety_doc)]
//! FFI keyed conversion
//!
//! Lookup by (type name, version, direction) for dispatchers that resolve
//! the struct at run time. Buffer lengths are passed in and checked.

use std::ffi::{c_char, c_int, CStr};
use std::slice;

use abibridge_core::{BridgeError, Direction, Side};
use abibridge_layout::Transcribe;

use crate::error::*;
use crate::registry;

fn invalid(msg: &str) -> AbiErrorCode {
    AbiErrorCode::InvalidArgument.raise(msg)
}

unsafe fn read_name<'a>(name: *const c_char) -> AbiResult<&'a str> {
    if name.is_null() {
        return Err(invalid("Null struct name"));
    }
    CStr::from_ptr(name)
        .to_str()
        .map_err(|_| invalid("Struct name is not UTF-8"))
}

/// Convert one struct between layouts
/// `direction`: 0 = foreign to native, 1 = native to foreign
/// Returns 0 on success, negative on error
#[no_mangle]
pub unsafe extern "C" fn abibridge_convert(
    name: *const c_char,
    version: u32,
    direction: u8,
    src: *const u8,
    src_len: usize,
    dst: *mut u8,
    dst_len: usize,
) -> c_int {
    status(convert(name, version, direction, src, src_len, dst, dst_len))
}

unsafe fn convert(
    name: *const c_char,
    version: u32,
    direction: u8,
    src: *const u8,
    src_len: usize,
    dst: *mut u8,
    dst_len: usize,
) -> AbiResult<()> {
    let name = read_name(name)?;
    let direction = Direction::from_byte(direction).ok_or_else(|| invalid("Unknown direction"))?;
    if src.is_null() || dst.is_null() {
        return Err(invalid("Null buffer"));
    }

    let registry = registry()?;
    let transcriber = registry.lookup(name, version, direction).map_err(report)?;

    let src = slice::from_raw_parts(src, src_len);
    let dst = slice::from_raw_parts_mut(dst, dst_len);
    transcriber.transcribe(src, dst).map_err(report)
}

/// Size in bytes of a struct in one layout
/// `side`: 0 = foreign, 1 = native
/// Returns 0 if the struct is unknown or the library is not initialized
#[no_mangle]
pub unsafe extern "C" fn abibridge_struct_size(
    name: *const c_char,
    version: u32,
    side: u8,
) -> usize {
    struct_size(name, version, side).unwrap_or(0)
}

unsafe fn struct_size(name: *const c_char, version: u32, side: u8) -> AbiResult<usize> {
    let name = read_name(name)?;
    let side = Side::from_byte(side).ok_or_else(|| invalid("Unknown side"))?;
    let registry = registry()?;
    let entry = registry.find(name, version).ok_or_else(|| {
        report(BridgeError::UnknownStruct(name.to_string(), version))
    })?;
    Ok(entry.size(side))
}
