// src/decode/roster.rs
use log::{debug, warn};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::fmt;

use crate::error::DirectoryError;
use crate::models::ServerRecord;

/// Decoding stopped early. `decoded` holds every `<server>` that was fully
/// closed before the failure.
#[derive(Debug)]
pub struct RosterDecodeError {
    pub error: DirectoryError,
    pub decoded: Vec<ServerRecord>,
}

impl fmt::Display for RosterDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (after {} servers)", self.error, self.decoded.len())
    }
}

impl std::error::Error for RosterDecodeError {}

/// Collects one `<server>` block while the reader walks through it.
struct ServerBuilder {
    record: ServerRecord,
    raw_players: Vec<String>,
}

impl ServerBuilder {
    fn new(ordinal: usize) -> Self {
        Self {
            record: ServerRecord {
                id: ordinal.to_string(),
                ..Default::default()
            },
            raw_players: Vec::new(),
        }
    }

    fn apply(&mut self, tag: &[u8], text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let server = &mut self.record;
        match tag {
            b"name" => server.name = text.to_string(),
            b"address" => server.ip_address = text.to_string(),
            b"port" => server.port = lenient_int(text),
            b"map_id" => server.map_id = text.to_string(),
            b"bots" => server.bots = lenient_int(text),
            b"country" => server.country = text.to_string(),
            b"current_players" => server.current_players = lenient_int(text),
            b"timestamp" => server.timestamp = text.parse().unwrap_or(0),
            b"version" => server.version = text.to_string(),
            b"dedicated" => server.dedicated = lenient_int(text) == 1,
            b"mod" => server.is_mod = text != "0",
            b"player" => self.raw_players.push(text.to_string()),
            b"comment" => server.comment = text.to_string(),
            b"url" => server.url = text.to_string(),
            b"max_players" => server.max_players = lenient_int(text),
            b"mode" => server.mode = text.to_string(),
            b"realm" => server.realm = Some(text.to_string()),
            _ => {}
        }
    }

    fn finish(mut self) -> ServerRecord {
        self.record.player_list = clean_player_list(self.raw_players);
        self.record
    }
}

fn lenient_int(text: &str) -> i32 {
    text.parse().unwrap_or(0)
}

fn clean_player_list(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .filter(|player| !player.trim().is_empty())
        .map(|player| player.trim().to_string())
        .collect()
}

/// Decodes one roster page in a single streaming pass.
pub fn decode_roster(xml: &str) -> Result<Vec<ServerRecord>, RosterDecodeError> {
    let mut reader = Reader::from_str(xml);
    let mut servers: Vec<ServerRecord> = Vec::new();
    let mut current: Option<ServerBuilder> = None;
    let mut current_tag: Option<Vec<u8>> = None;
    let mut text = String::new();
    let mut depth = 0usize;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                let error = DirectoryError::Decode(format!(
                    "at byte {}: {}",
                    reader.buffer_position(),
                    e
                ));
                return Err(RosterDecodeError { error, decoded: servers });
            }
        };

        match event {
            Event::Start(start) => {
                depth += 1;
                let name = start.name();
                if name.as_ref() == b"server" {
                    current = Some(ServerBuilder::new(servers.len()));
                    current_tag = None;
                } else if current.is_some() {
                    current_tag = Some(name.as_ref().to_vec());
                    text.clear();
                }
            }
            Event::Text(content) => {
                if current_tag.is_some() {
                    match content.unescape() {
                        Ok(unescaped) => text.push_str(&unescaped),
                        Err(e) => {
                            let error = DirectoryError::Decode(e.to_string());
                            return Err(RosterDecodeError { error, decoded: servers });
                        }
                    }
                }
            }
            Event::CData(content) => {
                if current_tag.is_some() {
                    text.push_str(&String::from_utf8_lossy(&content.into_inner()));
                }
            }
            Event::End(end) => {
                depth = depth.saturating_sub(1);
                let name = end.name();
                if name.as_ref() == b"server" {
                    if let Some(builder) = current.take() {
                        servers.push(builder.finish());
                    }
                    current_tag = None;
                } else if let (Some(builder), Some(tag)) = (current.as_mut(), current_tag.take()) {
                    if tag == name.as_ref() {
                        builder.apply(&tag, &text);
                    }
                    text.clear();
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth > 0 {
        let error = DirectoryError::Decode(format!("document ended with {} open elements", depth));
        return Err(RosterDecodeError { error, decoded: servers });
    }

    debug!("Parsed {} servers from XML", servers.len());
    Ok(servers)
}

/// Like [`decode_roster`], but logs a failure and keeps the servers closed
/// before it.
pub fn decode_roster_lenient(xml: &str) -> Vec<ServerRecord> {
    match decode_roster(xml) {
        Ok(servers) => servers,
        Err(e) => {
            warn!("Error parsing roster XML: {}", e);
            e.decoded
        }
    }
}
