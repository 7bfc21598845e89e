// src/models/mod.rs
pub mod map;
pub mod server;

pub use map::MapRecord;
pub use server::{ServerRecord, ServerView, UNKNOWN_MAP};
