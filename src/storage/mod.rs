// src/storage/mod.rs
pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Persisted key-value map used for the map catalog and its timestamp.
pub trait KeyValueStore: Send + Sync {
    fn get_string(&self, key: &str) -> Option<String>;
    fn put_string(&self, key: &str, value: &str);
    fn get_long(&self, key: &str, default: i64) -> i64;
    fn put_long(&self, key: &str, value: i64);
}
