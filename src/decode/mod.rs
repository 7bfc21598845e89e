// src/decode/mod.rs
pub mod catalog;
pub mod roster;

pub use catalog::decode_catalog;
pub use roster::{decode_roster, decode_roster_lenient, RosterDecodeError};
