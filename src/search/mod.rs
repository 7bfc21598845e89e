// src/search/mod.rs
pub mod highlight;

pub use highlight::{highlight, Span};

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::ServerRecord;

lazy_static! {
    static ref MAP_NUMBER: Regex = Regex::new(r"(?i)maps/map(\d+)").expect("valid map number pattern");
}

/// Splits a query on whitespace runs, dropping empty pieces.
pub fn tokenize(query: &str) -> Vec<&str> {
    query.split_whitespace().collect()
}

/// Pulls the numeric suffix out of ids like `media/packages/vanilla/maps/map10`.
pub fn extract_map_number(map_id: &str) -> Option<String> {
    MAP_NUMBER
        .captures(map_id)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Servers matching at least one query token. A blank query returns the
/// roster unchanged.
pub fn search(roster: &[ServerRecord], query: &str) -> Vec<ServerRecord> {
    let tokens = tokenize(query);
    if tokens.is_empty() {
        return roster.to_vec();
    }
    let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();

    roster
        .iter()
        .filter(|server| lowered.iter().any(|token| matches_token(server, token)))
        .cloned()
        .collect()
}

fn contains_ci(field: &str, lowered_token: &str) -> bool {
    field.to_lowercase().contains(lowered_token)
}

// Exact match is a special case of substring match on the decimal form.
fn matches_number(value: i32, token: &str) -> bool {
    value.to_string().contains(token)
}

fn matches_token(server: &ServerRecord, token: &str) -> bool {
    let dedicated = if server.dedicated { "dedicated" } else { "non-dedicated" };
    let flavour = if server.is_mod { "mod" } else { "vanilla" };

    contains_ci(&server.name, token)
        || contains_ci(&server.ip_address, token)
        || matches_number(server.port, token)
        || matches_number(server.bots, token)
        || contains_ci(&server.country, token)
        || contains_ci(&server.mode, token)
        || contains_ci(&server.map_name, token)
        || contains_ci(&server.map_id, token)
        || extract_map_number(&server.map_id).as_deref() == Some(token)
        || matches_number(server.current_players, token)
        || matches_number(server.max_players, token)
        || server.player_list.iter().any(|player| contains_ci(player, token))
        || contains_ci(&server.comment, token)
        || contains_ci(&server.version, token)
        || dedicated.contains(token)
        || flavour.contains(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn roster() -> Vec<ServerRecord> {
        vec![
            ServerRecord {
                id: "0".into(),
                name: "Gaming Server".into(),
                ip_address: "192.168.1.1".into(),
                port: 27015,
                map_id: "media/packages/vanilla/maps/map10".into(),
                map_name: "Moorland Trenches".into(),
                country: "US".into(),
                current_players: 2,
                max_players: 32,
                version: "1.95".into(),
                dedicated: true,
                player_list: vec!["Alice".into(), "Bob".into()],
                mode: "invasion".into(),
                ..Default::default()
            },
            ServerRecord {
                id: "1".into(),
                name: "Another Server".into(),
                ip_address: "203.0.113.9".into(),
                port: 1234,
                map_id: "media/packages/pacific/maps/island3".into(),
                map_name: "Pacific Island".into(),
                country: "FI".into(),
                bots: 40,
                current_players: 1,
                max_players: 16,
                version: "1.94".into(),
                is_mod: true,
                player_list: vec!["Charlie".into()],
                comment: "Hardcore rules".into(),
                mode: "pvp".into(),
                ..Default::default()
            },
        ]
    }

    fn names(servers: &[ServerRecord]) -> Vec<&str> {
        servers.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn blank_query_is_identity() {
        let roster = roster();
        for query in ["", "   ", "\t\n"] {
            assert_eq!(search(&roster, query), roster);
        }
    }

    #[test]
    fn player_names_match_case_insensitively() {
        let roster = roster();
        assert_eq!(names(&search(&roster, "bob")), vec!["Gaming Server"]);
        assert_eq!(names(&search(&roster, "CHAR")), vec!["Another Server"]);
    }

    #[test]
    fn tokens_are_or_combined() {
        let roster = roster();
        let both = search(&roster, "alice hardcore");
        assert_eq!(names(&both), vec!["Gaming Server", "Another Server"]);

        for (a, b) in [("alice", "hardcore"), ("FI", "invasion"), ("zzz", "27015"), ("zzz", "yyy")] {
            let union: Vec<ServerRecord> = roster
                .iter()
                .filter(|s| search(&roster, a).contains(s) || search(&roster, b).contains(s))
                .cloned()
                .collect();
            assert_eq!(search(&roster, &format!("{} {}", a, b)), union);
        }
    }

    #[test]
    fn numeric_fields_match_exact_or_partial() {
        let roster = roster();
        assert_eq!(names(&search(&roster, "27015")), vec!["Gaming Server"]);
        assert_eq!(names(&search(&roster, "270")), vec!["Gaming Server"]);
        assert_eq!(names(&search(&roster, "40")), vec!["Another Server"]);
    }

    #[test]
    fn map_number_token_matches() {
        let roster = roster();
        assert_eq!(names(&search(&roster, "10")), vec!["Gaming Server"]);
        assert_eq!(names(&search(&roster, "trenches")), vec!["Gaming Server"]);
        assert_eq!(names(&search(&roster, "island3")), vec!["Another Server"]);
    }

    #[test]
    fn derived_flag_literals_match() {
        let roster = roster();
        assert_eq!(names(&search(&roster, "non-dedicated")), vec!["Another Server"]);
        assert_eq!(names(&search(&roster, "vanilla")), vec!["Gaming Server"]);
        // "dedicated" is a substring of both literals.
        assert_eq!(search(&roster, "dedicated").len(), 2);
    }

    #[test]
    fn extracts_map_numbers() {
        assert_eq!(extract_map_number("media/packages/vanilla/maps/map10").as_deref(), Some("10"));
        assert_eq!(extract_map_number("MEDIA/PACKAGES/VANILLA/MAPS/MAP3").as_deref(), Some("3"));
        assert_eq!(extract_map_number("no/match/here"), None);
        assert_eq!(extract_map_number(""), None);
    }

    #[test]
    fn tokenizer_drops_whitespace_runs() {
        assert_eq!(tokenize("  a \t b\n\nc "), vec!["a", "b", "c"]);
        assert!(tokenize("   ").is_empty());
    }
}
