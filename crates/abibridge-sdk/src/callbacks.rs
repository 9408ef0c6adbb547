//! Callback payloads
//!
//! Notifications are produced on the native side and delivered to the
//! foreign side, so each payload only gets a native-to-foreign
//! transcriber.

use std::fmt;
use std::mem::offset_of;

use abibridge_core::{Direction, StructVersionKey};
use abibridge_layout::{FieldSpec, LayoutDescriptor, ScalarWidth};
use abibridge_registry::OffsetCheck;

/// Direction every callback payload travels
pub const CALLBACK_DIRECTION: Direction = Direction::NativeToForeign;

/// Friend lobby enumeration result
pub static REQUEST_FRIENDS_LOBBIES_RESPONSE_24: LayoutDescriptor = LayoutDescriptor {
    key: StructVersionKey::new("RequestFriendsLobbiesResponse_t", 24),
    fields: &[
        FieldSpec::handle("m_ulSteamIDFriend", ScalarWidth::W8),
        FieldSpec::handle("m_ulSteamIDLobby", ScalarWidth::W8),
        FieldSpec::i32("m_cResultIndex"),
        FieldSpec::i32("m_cResultsTotal"),
    ],
};

pub const REQUEST_FRIENDS_LOBBIES_RESPONSE_24_FOREIGN_SIZE: usize = 24;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestFriendsLobbiesResponse {
    pub steam_id_friend: u64,
    pub steam_id_lobby: u64,
    pub result_index: i32,
    pub results_total: i32,
}

impl RequestFriendsLobbiesResponse {
    pub fn native_offsets() -> OffsetCheck {
        OffsetCheck::native(vec![
            ("m_ulSteamIDFriend", offset_of!(RequestFriendsLobbiesResponse, steam_id_friend)),
            ("m_ulSteamIDLobby", offset_of!(RequestFriendsLobbiesResponse, steam_id_lobby)),
            ("m_cResultIndex", offset_of!(RequestFriendsLobbiesResponse, result_index)),
            ("m_cResultsTotal", offset_of!(RequestFriendsLobbiesResponse, results_total)),
        ])
    }
}

/// Stats download finished
pub static USER_STATS_RECEIVED_12: LayoutDescriptor = LayoutDescriptor {
    key: StructVersionKey::new("UserStatsReceived_t", 12),
    fields: &[
        FieldSpec::u64("m_nGameID"),
        FieldSpec::enumeration("m_eResult", ScalarWidth::W4),
    ],
};

/// The trailing 4 bytes are tail padding on the foreign side; 32-bit
/// hosts align `u64` to 4 and have none
pub const USER_STATS_RECEIVED_12_FOREIGN_SIZE: usize = 16;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UserStatsReceived {
    pub game_id: u64,
    pub result: EResult,
}

impl UserStatsReceived {
    pub fn native_offsets() -> OffsetCheck {
        OffsetCheck::native(vec![
            ("m_nGameID", offset_of!(UserStatsReceived, game_id)),
            ("m_eResult", offset_of!(UserStatsReceived, result)),
        ])
    }
}

/// Result code carried in callback payloads
///
/// Stored as a plain 32-bit integer; values outside the known set pass
/// through conversion untouched.
#[repr(transparent)]
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EResult(pub i32);

impl EResult {
    pub const OK: EResult = EResult(1);
    pub const FAIL: EResult = EResult(2);
    pub const NO_CONNECTION: EResult = EResult(3);
    pub const INVALID_PASSWORD: EResult = EResult(5);
    pub const LOGGED_IN_ELSEWHERE: EResult = EResult(6);
    pub const INVALID_PARAM: EResult = EResult(8);
    pub const FILE_NOT_FOUND: EResult = EResult(9);
    pub const BUSY: EResult = EResult(10);
    pub const ACCESS_DENIED: EResult = EResult(15);
    pub const TIMEOUT: EResult = EResult(16);

    pub fn name(self) -> Option<&'static str> {
        match self {
            EResult::OK => Some("OK"),
            EResult::FAIL => Some("Fail"),
            EResult::NO_CONNECTION => Some("NoConnection"),
            EResult::INVALID_PASSWORD => Some("InvalidPassword"),
            EResult::LOGGED_IN_ELSEWHERE => Some("LoggedInElsewhere"),
            EResult::INVALID_PARAM => Some("InvalidParam"),
            EResult::FILE_NOT_FOUND => Some("FileNotFound"),
            EResult::BUSY => Some("Busy"),
            EResult::ACCESS_DENIED => Some("AccessDenied"),
            EResult::TIMEOUT => Some("Timeout"),
            _ => None,
        }
    }
}

impl fmt::Debug for EResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "EResult::{}", name),
            None => write!(f, "EResult({})", self.0),
        }
    }
}
