// src/storage/file.rs
use log::{error, warn};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::KeyValueStore;

/// Key-value store persisted as one JSON object on disk. Every put rewrites
/// the file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: Mutex<Map<String, Value>>,
}

impl FileStore {
    /// Opens the store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Map<String, Value>>(&contents) {
                Ok(values) => values,
                Err(e) => {
                    warn!("Ignoring corrupt store file {}: {}", path.display(), e);
                    Map::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Map::new(),
            Err(e) => {
                warn!("Failed to read store file {}: {}", path.display(), e);
                Map::new()
            }
        };
        Self {
            path,
            values: Mutex::new(values),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn put(&self, key: &str, value: Value) {
        let mut values = self.values.lock();
        values.insert(key.to_string(), value);
        if let Err(e) = write_atomically(&self.path, &values) {
            error!("Failed to persist store file {}: {}", self.path.display(), e);
        }
    }
}

fn write_atomically(path: &Path, values: &Map<String, Value>) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let contents = serde_json::to_string(values).map_err(io::Error::other)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)
}

impl KeyValueStore for FileStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn put_string(&self, key: &str, value: &str) {
        self.put(key, Value::String(value.to_string()));
    }

    fn get_long(&self, key: &str, default: i64) -> i64 {
        self.values
            .lock()
            .get(key)
            .and_then(Value::as_i64)
            .unwrap_or(default)
    }

    fn put_long(&self, key: &str, value: i64) {
        self.put(key, Value::from(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache").join("store.json");

        let store = FileStore::open(&path);
        assert_eq!(store.get_string("maps_data"), None);
        store.put_string("maps_data", "[]");
        store.put_long("maps_timestamp", 1_700_000_000_000);

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get_string("maps_data").as_deref(), Some("[]"));
        assert_eq!(reopened.get_long("maps_timestamp", 0), 1_700_000_000_000);
        assert_eq!(reopened.path(), path.as_path());
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get_long("maps_timestamp", -1), -1);
    }
}
