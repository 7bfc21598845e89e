// src/storage/memory.rs
use dashmap::DashMap;

use super::KeyValueStore;

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Text(String),
    Long(i64),
}

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: DashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            values: DashMap::new(),
        }
    }

    pub fn remove(&self, key: &str) {
        self.values.remove(key);
    }
}

impl KeyValueStore for MemoryStore {
    fn get_string(&self, key: &str) -> Option<String> {
        match self.values.get(key).map(|r| r.value().clone()) {
            Some(Value::Text(text)) => Some(text),
            _ => None,
        }
    }

    fn put_string(&self, key: &str, value: &str) {
        self.values.insert(key.to_string(), Value::Text(value.to_string()));
    }

    fn get_long(&self, key: &str, default: i64) -> i64 {
        match self.values.get(key).map(|r| r.value().clone()) {
            Some(Value::Long(n)) => n,
            _ => default,
        }
    }

    fn put_long(&self, key: &str, value: i64) {
        self.values.insert(key.to_string(), Value::Long(value));
    }
}
