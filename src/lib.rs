// src/lib.rs
pub mod cache;
pub mod config;
pub mod decode;
pub mod error;
pub mod fetcher;
pub mod handlers;
pub mod models;
pub mod search;
pub mod storage;
pub mod transport;
pub mod utils;

#[cfg(test)]
mod testing;

pub use cache::MapCatalogCache;
pub use config::Config;
pub use error::DirectoryError;
pub use fetcher::{RosterFetcher, RosterSnapshot};
pub use models::{MapRecord, ServerRecord};
pub use search::{extract_map_number, highlight, search, Span};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use transport::{HttpTransport, Transport, TransportResponse};
