//! Call-argument structs of SDK release 102
//!
//! These cross the boundary in both directions and get converter pairs.
//! Each descriptor has a `#[repr(C)]` host mirror; the mirror's size is
//! what the native layout must come out to.

use std::mem::offset_of;

use abibridge_core::StructVersionKey;
use abibridge_layout::{FieldSpec, LayoutDescriptor, ScalarWidth, POINTER_SIZE};
use abibridge_registry::OffsetCheck;

/// Callback message envelope
pub static CALLBACK_MSG_102: LayoutDescriptor = LayoutDescriptor {
    key: StructVersionKey::new("CallbackMsg_t", 102),
    fields: &[
        FieldSpec::handle("m_hSteamUser", ScalarWidth::W4),
        FieldSpec::i32("m_iCallback"),
        FieldSpec::pointer("m_pubParam"),
        FieldSpec::i32("m_cubParam"),
    ],
};

/// Foreign size: the parameter pointer forces 8-byte alignment on 64-bit
pub const CALLBACK_MSG_102_FOREIGN_SIZE: usize = if POINTER_SIZE == 8 { 24 } else { 16 };

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct CallbackMsg {
    pub h_steam_user: i32,
    pub i_callback: i32,
    pub pub_param: *mut u8,
    pub cub_param: i32,
}

impl CallbackMsg {
    pub fn native_offsets() -> OffsetCheck {
        OffsetCheck::native(vec![
            ("m_hSteamUser", offset_of!(CallbackMsg, h_steam_user)),
            ("m_iCallback", offset_of!(CallbackMsg, i_callback)),
            ("m_pubParam", offset_of!(CallbackMsg, pub_param)),
            ("m_cubParam", offset_of!(CallbackMsg, cub_param)),
        ])
    }
}

/// Game server network address
pub static SERVERNETADR_102: LayoutDescriptor = LayoutDescriptor {
    key: StructVersionKey::new("servernetadr_t", 102),
    fields: &[
        FieldSpec::u16("m_usConnectionPort"),
        FieldSpec::u16("m_usQueryPort"),
        FieldSpec::u32("m_unIP"),
    ],
};

pub const SERVERNETADR_102_FOREIGN_SIZE: usize = 8;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ServerNetAdr {
    pub connection_port: u16,
    pub query_port: u16,
    pub ip: u32,
}

impl ServerNetAdr {
    pub fn native_offsets() -> OffsetCheck {
        OffsetCheck::native(vec![
            ("m_usConnectionPort", offset_of!(ServerNetAdr, connection_port)),
            ("m_usQueryPort", offset_of!(ServerNetAdr, query_port)),
            ("m_unIP", offset_of!(ServerNetAdr, ip)),
        ])
    }
}

/// Server browser entry; embeds `servernetadr_t`
pub static GAMESERVERITEM_102: LayoutDescriptor = LayoutDescriptor {
    key: StructVersionKey::new("gameserveritem_t", 102),
    fields: &[
        FieldSpec::nested("m_NetAdr", &SERVERNETADR_102),
        FieldSpec::i32("m_nPing"),
        FieldSpec::boolean("m_bHadSuccessfulResponse"),
        FieldSpec::boolean("m_bDoNotRefresh"),
        FieldSpec::bytes("m_szGameDir", 32),
        FieldSpec::bytes("m_szMap", 32),
        FieldSpec::bytes("m_szGameDescription", 64),
        FieldSpec::i32("m_nAppID"),
        FieldSpec::i32("m_nPlayers"),
        FieldSpec::i32("m_nMaxPlayers"),
        FieldSpec::i32("m_nBotPlayers"),
        FieldSpec::boolean("m_bPassword"),
        FieldSpec::boolean("m_bSecure"),
        FieldSpec::u32("m_ulTimeLastPlayed"),
        FieldSpec::i32("m_nServerVersion"),
        FieldSpec::bytes("m_szServerName", 64),
        FieldSpec::bytes("m_szGameTags", 128),
    ],
};

pub const GAMESERVERITEM_102_FOREIGN_SIZE: usize = 364;

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct GameServerItem {
    pub net_adr: ServerNetAdr,
    pub ping: i32,
    pub had_successful_response: bool,
    pub do_not_refresh: bool,
    pub game_dir: [u8; 32],
    pub map: [u8; 32],
    pub game_description: [u8; 64],
    pub app_id: i32,
    pub players: i32,
    pub max_players: i32,
    pub bot_players: i32,
    pub password: bool,
    pub secure: bool,
    pub time_last_played: u32,
    pub server_version: i32,
    pub server_name: [u8; 64],
    pub game_tags: [u8; 128],
}

impl GameServerItem {
    pub fn native_offsets() -> OffsetCheck {
        let adr = offset_of!(GameServerItem, net_adr);
        OffsetCheck::native(vec![
            ("m_NetAdr.m_usConnectionPort", adr + offset_of!(ServerNetAdr, connection_port)),
            ("m_NetAdr.m_usQueryPort", adr + offset_of!(ServerNetAdr, query_port)),
            ("m_NetAdr.m_unIP", adr + offset_of!(ServerNetAdr, ip)),
            ("m_nPing", offset_of!(GameServerItem, ping)),
            ("m_bHadSuccessfulResponse", offset_of!(GameServerItem, had_successful_response)),
            ("m_bDoNotRefresh", offset_of!(GameServerItem, do_not_refresh)),
            ("m_szGameDir", offset_of!(GameServerItem, game_dir)),
            ("m_szMap", offset_of!(GameServerItem, map)),
            ("m_szGameDescription", offset_of!(GameServerItem, game_description)),
            ("m_nAppID", offset_of!(GameServerItem, app_id)),
            ("m_nPlayers", offset_of!(GameServerItem, players)),
            ("m_nMaxPlayers", offset_of!(GameServerItem, max_players)),
            ("m_nBotPlayers", offset_of!(GameServerItem, bot_players)),
            ("m_bPassword", offset_of!(GameServerItem, password)),
            ("m_bSecure", offset_of!(GameServerItem, secure)),
            ("m_ulTimeLastPlayed", offset_of!(GameServerItem, time_last_played)),
            ("m_nServerVersion", offset_of!(GameServerItem, server_version)),
            ("m_szServerName", offset_of!(GameServerItem, server_name)),
            ("m_szGameTags", offset_of!(GameServerItem, game_tags)),
        ])
    }
}
