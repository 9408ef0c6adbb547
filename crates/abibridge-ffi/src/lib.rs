#![allow(clippy::missing_safety_doc)]
//! abibridge FFI - Foreign Function Interface
//!
//! C-compatible entry points for the external call dispatcher.
//! `abibridge_init` populates the converter registry once; every
//! conversion entry point fails with `NotInitialized` before that.

pub mod convert;
pub mod entry;
pub mod error;

use std::ffi::{c_char, c_int};
use std::sync::Arc;

use abibridge_registry::Registry;
use parking_lot::RwLock;
use tracing_subscriber::EnvFilter;

pub use convert::*;
pub use entry::*;
pub use error::*;

static REGISTRY: RwLock<Option<Arc<Registry>>> = RwLock::new(None);

/// Library version
#[no_mangle]
pub extern "C" fn abibridge_version() -> *const c_char {
    static VERSION: &[u8] = b"0.2.0\0";
    VERSION.as_ptr() as *const c_char
}

/// Initialize the abibridge library
/// Must be called before any conversion
/// Returns 0 on success, negative on error
#[no_mangle]
pub extern "C" fn abibridge_init() -> c_int {
    init_logging();

    let mut slot = REGISTRY.write();
    if slot.is_some() {
        return AbiErrorCode::AlreadyInitialized.raise("Already initialized").into();
    }

    match abibridge_sdk::default_registry() {
        Ok(registry) => {
            tracing::info!(structs = registry.len(), "abibridge initialized");
            *slot = Some(Arc::new(registry));
            AbiErrorCode::Ok.into()
        }
        Err(err) => {
            tracing::warn!(error = %err, "abibridge initialization failed");
            report(err).into()
        }
    }
}

/// Shutdown the abibridge library
/// Conversions in flight keep their registry alive until they return
#[no_mangle]
pub extern "C" fn abibridge_shutdown() {
    if REGISTRY.write().take().is_some() {
        tracing::info!("abibridge shut down");
    }
}

/// Install a registry built by the embedding program instead of the
/// SDK default
pub fn install_registry(registry: Arc<Registry>) -> AbiResult<()> {
    let mut slot = REGISTRY.write();
    if slot.is_some() {
        return Err(AbiErrorCode::AlreadyInitialized.raise("Already initialized"));
    }
    *slot = Some(registry);
    Ok(())
}

/// Registry installed by `abibridge_init`
pub fn registry() -> AbiResult<Arc<Registry>> {
    REGISTRY
        .read()
        .clone()
        .ok_or_else(|| AbiErrorCode::NotInitialized.raise("Not initialized"))
}

fn init_logging() {
    // The host may already have a subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
