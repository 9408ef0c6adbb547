//! abibridge SDK - Layout descriptors for the supported API surface
//!
//! This crate is the single authoritative statement of every struct the
//! bridge converts:
//! - Call-argument structs (converter pairs)
//! - Callback payloads (native-to-foreign transcribers)
//! - Host mirror types used to assert native sizes and field offsets at
//!   registration

pub mod callbacks;
pub mod structs;

pub use callbacks::*;
pub use structs::*;

use std::mem::size_of;

use abibridge_core::BridgeResult;
use abibridge_layout::{LayoutDescriptor, LayoutRules};
use abibridge_registry::{OffsetCheck, Registry, RegistryBuilder, SizeCheck};

/// A supported struct with the layout asserted when it is registered
#[derive(Clone, Debug)]
pub struct Supported {
    pub descriptor: &'static LayoutDescriptor,
    pub sizes: SizeCheck,
    /// Native offset of every leaf field, from the host mirror
    pub offsets: OffsetCheck,
}

/// Converter pairs
pub fn pairs() -> [Supported; 3] {
    [
        Supported {
            descriptor: &CALLBACK_MSG_102,
            sizes: SizeCheck::new(CALLBACK_MSG_102_FOREIGN_SIZE, size_of::<CallbackMsg>()),
            offsets: CallbackMsg::native_offsets(),
        },
        Supported {
            descriptor: &SERVERNETADR_102,
            sizes: SizeCheck::new(SERVERNETADR_102_FOREIGN_SIZE, size_of::<ServerNetAdr>()),
            offsets: ServerNetAdr::native_offsets(),
        },
        Supported {
            descriptor: &GAMESERVERITEM_102,
            sizes: SizeCheck::new(GAMESERVERITEM_102_FOREIGN_SIZE, size_of::<GameServerItem>()),
            offsets: GameServerItem::native_offsets(),
        },
    ]
}

/// Callback payloads
pub fn callback_payloads() -> [Supported; 2] {
    [
        Supported {
            descriptor: &REQUEST_FRIENDS_LOBBIES_RESPONSE_24,
            sizes: SizeCheck::new(
                REQUEST_FRIENDS_LOBBIES_RESPONSE_24_FOREIGN_SIZE,
                size_of::<RequestFriendsLobbiesResponse>(),
            ),
            offsets: RequestFriendsLobbiesResponse::native_offsets(),
        },
        Supported {
            descriptor: &USER_STATS_RECEIVED_12,
            sizes: SizeCheck::new(
                USER_STATS_RECEIVED_12_FOREIGN_SIZE,
                size_of::<UserStatsReceived>(),
            ),
            offsets: UserStatsReceived::native_offsets(),
        },
    ]
}

/// Add every supported struct to `builder`, with its size and offset
/// assertions
pub fn register_all(builder: &mut RegistryBuilder) {
    for s in pairs() {
        builder
            .register_pair(s.descriptor)
            .expect_sizes(s.descriptor.key, s.sizes)
            .expect_offsets(s.descriptor.key, s.offsets);
    }
    for s in callback_payloads() {
        builder
            .register_callback(s.descriptor, CALLBACK_DIRECTION)
            .expect_sizes(s.descriptor.key, s.sizes)
            .expect_offsets(s.descriptor.key, s.offsets);
    }
    tracing::debug!(pending = builder.len(), "sdk structs queued for registration");
}

/// Registry holding every supported struct under the default rules
pub fn default_registry() -> BridgeResult<Registry> {
    let mut builder = RegistryBuilder::new(LayoutRules::default());
    register_all(&mut builder);
    builder.build()
}
