//! FFI Error handling

use std::cell::RefCell;
use std::ffi::{c_char, c_int, CString};

use abibridge_core::BridgeError;

/// Error codes for FFI functions
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbiErrorCode {
    /// Success
    Ok = 0,
    /// Invalid argument (null pointer, bad direction or side byte, bad name)
    InvalidArgument = -1,
    /// Registry not initialized
    NotInitialized = -2,
    /// Already initialized
    AlreadyInitialized = -3,
    /// No converter for (type, version)
    UnknownStruct = -4,
    /// Converter exists but not for the requested direction
    DirectionUnavailable = -5,
    /// Buffer too small
    BufferTooSmall = -6,
    /// Descriptor does not match the asserted layout
    LayoutError = -7,
    /// Internal error
    InternalError = -99,
}

impl From<AbiErrorCode> for c_int {
    fn from(code: AbiErrorCode) -> Self {
        code as c_int
    }
}

impl From<&BridgeError> for AbiErrorCode {
    fn from(err: &BridgeError) -> Self {
        match err {
            BridgeError::BufferTooShort { .. } => AbiErrorCode::BufferTooSmall,
            BridgeError::UnknownStruct(..) => AbiErrorCode::UnknownStruct,
            BridgeError::DirectionUnavailable { .. } | BridgeError::WrongKind { .. } => {
                AbiErrorCode::DirectionUnavailable
            }
            BridgeError::InvalidPacking(_)
            | BridgeError::EmptyLayout(_)
            | BridgeError::LayoutMismatch { .. }
            | BridgeError::OffsetMismatch { .. }
            | BridgeError::UnknownField { .. } => AbiErrorCode::LayoutError,
            BridgeError::DuplicateRegistration(_) => AbiErrorCode::InternalError,
        }
    }
}

/// Failure recorded per calling thread
struct Failure {
    code: AbiErrorCode,
    message: CString,
}

thread_local! {
    static LAST_FAILURE: RefCell<Option<Failure>> = const { RefCell::new(None) };
}

impl AbiErrorCode {
    /// Record this code and `message` as the calling thread's last failure
    pub fn raise(self, message: &str) -> Self {
        let message = CString::new(message.replace('\0', "")).unwrap_or_default();
        LAST_FAILURE.with(|slot| *slot.borrow_mut() = Some(Failure { code: self, message }));
        self
    }
}

/// Record a bridge error as the last failure and return its code
pub fn report(err: BridgeError) -> AbiErrorCode {
    AbiErrorCode::from(&err).raise(&err.to_string())
}

/// Message of the calling thread's last failure
/// Returns NULL if there is none; valid until the next failing call
#[no_mangle]
pub extern "C" fn abibridge_get_last_error() -> *const c_char {
    LAST_FAILURE.with(|slot| match slot.borrow().as_ref() {
        Some(failure) => failure.message.as_ptr(),
        None => std::ptr::null(),
    })
}

/// Code of the calling thread's last failure, 0 if there is none
#[no_mangle]
pub extern "C" fn abibridge_last_error_code() -> c_int {
    LAST_FAILURE.with(|slot| slot.borrow().as_ref().map_or(0, |f| f.code.into()))
}

#[no_mangle]
pub extern "C" fn abibridge_clear_error() {
    LAST_FAILURE.with(|slot| slot.borrow_mut().take());
}

/// Result type for FFI functions
pub type AbiResult<T> = Result<T, AbiErrorCode>;

/// Status code returned across the C ABI: 0 or a negative `AbiErrorCode`
pub fn status<T>(result: AbiResult<T>) -> c_int {
    result.map_or_else(c_int::from, |_| AbiErrorCode::Ok.into())
}
