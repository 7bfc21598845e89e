// src/models/server.rs
use serde::{Deserialize, Serialize};

pub const UNKNOWN_MAP: &str = "Unknown Map";

/// One live game server as reported by a single roster page.
///
/// `id` is the record's position within the decode pass that produced it and
/// is not stable across refreshes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerRecord {
    pub id: String,
    pub name: String,
    pub ip_address: String,
    pub port: i32,
    pub map_id: String,
    pub map_name: String,
    pub bots: i32,
    pub country: String,
    pub current_players: i32,
    pub timestamp: i64,
    pub version: String,
    pub dedicated: bool,
    #[serde(rename = "mod")]
    pub is_mod: bool,
    pub player_list: Vec<String>,
    pub comment: String,
    pub url: String,
    pub max_players: i32,
    pub mode: String,
    pub realm: Option<String>,
    pub map_image: Option<String>,
}

impl Default for ServerRecord {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            ip_address: String::new(),
            port: 0,
            map_id: String::new(),
            map_name: UNKNOWN_MAP.to_string(),
            bots: 0,
            country: String::new(),
            current_players: 0,
            timestamp: 0,
            version: String::new(),
            dedicated: false,
            is_mod: false,
            player_list: Vec::new(),
            comment: String::new(),
            url: String::new(),
            max_players: 0,
            mode: String::new(),
            realm: None,
            map_image: None,
        }
    }
}

impl ServerRecord {
    pub fn is_online(&self) -> bool {
        self.current_players > 0 || self.bots > 0
    }

    pub fn player_slot_status(&self) -> String {
        format!("{}/{}", self.current_players, self.max_players)
    }

    pub fn server_location(&self) -> &str {
        if self.country.is_empty() {
            "Unknown"
        } else {
            &self.country
        }
    }

    pub fn display_mode(&self) -> &str {
        if self.mode.is_empty() {
            "Unknown"
        } else {
            &self.mode
        }
    }
}

/// Roster entry as served to the presentation layer, with derived fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerView<'a> {
    #[serde(flatten)]
    pub server: &'a ServerRecord,
    pub is_online: bool,
    pub player_slot_status: String,
    pub server_location: &'a str,
    pub display_mode: &'a str,
}

impl<'a> From<&'a ServerRecord> for ServerView<'a> {
    fn from(server: &'a ServerRecord) -> Self {
        Self {
            server,
            is_online: server.is_online(),
            player_slot_status: server.player_slot_status(),
            server_location: server.server_location(),
            display_mode: server.display_mode(),
        }
    }
}
