// src/cache/catalog.rs
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use crate::decode::decode_catalog;
use crate::models::{MapRecord, ServerRecord, UNKNOWN_MAP};
use crate::storage::KeyValueStore;
use crate::transport::Transport;
use crate::utils::now_millis;

pub const KEY_MAPS_DATA: &str = "maps_data";
pub const KEY_MAPS_TIMESTAMP: &str = "maps_timestamp";

struct CatalogState {
    maps: Arc<Vec<MapRecord>>,
    updated_at: i64,
    refresh_pending: bool,
}

/// Two-tier map catalog: process memory first, then the persisted store,
/// with one network refresh allowed per foreground activation.
pub struct MapCatalogCache {
    transport: Arc<dyn Transport>,
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
    state: Mutex<CatalogState>,
}

impl MapCatalogCache {
    pub fn new(transport: Arc<dyn Transport>, store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self {
            transport,
            store,
            ttl,
            state: Mutex::new(CatalogState {
                maps: Arc::new(Vec::new()),
                updated_at: 0,
                // Process start counts as an activation.
                refresh_pending: true,
            }),
        }
    }

    /// Arms the one-shot refresh flag. Called on every foreground activation.
    pub fn mark_needs_refresh(&self) {
        self.state.lock().refresh_pending = true;
        debug!("Map catalog marked for refresh");
    }

    pub fn updated_at(&self) -> i64 {
        self.state.lock().updated_at
    }

    pub async fn get_catalog(&self) -> Arc<Vec<MapRecord>> {
        if let Some(maps) = self.memory() {
            debug!("Using in-memory maps cache");
            return maps;
        }

        if let Some((maps, timestamp)) = self.load_persisted(true) {
            debug!("Using persistent cached maps data");
            return self.remember(maps, timestamp);
        }

        if self.take_refresh_flag() {
            if let Some(maps) = self.fetch_from_api().await {
                return maps;
            }
        }

        if let Some(maps) = self.memory() {
            return maps;
        }
        // Expired data is served but never promoted to memory, so the next
        // activation still reaches the network.
        if let Some((maps, _)) = self.load_persisted(false) {
            warn!("Using expired persistent maps cache ({} maps)", maps.len());
            return Arc::new(maps);
        }

        warn!("No maps available, returning empty list");
        Arc::new(Vec::new())
    }

    pub async fn find_map_image(&self, map_id: &str) -> Option<String> {
        let maps = self.get_catalog().await;
        find_map(&maps, map_id).map(|m| m.image.clone())
    }

    pub async fn map_name(&self, map_id: &str) -> String {
        let maps = self.get_catalog().await;
        find_map(&maps, map_id)
            .map(|m| m.name.clone())
            .unwrap_or_else(|| UNKNOWN_MAP.to_string())
    }

    fn memory(&self) -> Option<Arc<Vec<MapRecord>>> {
        let state = self.state.lock();
        if state.maps.is_empty() {
            None
        } else {
            Some(state.maps.clone())
        }
    }

    fn remember(&self, maps: Vec<MapRecord>, timestamp: i64) -> Arc<Vec<MapRecord>> {
        let maps = Arc::new(maps);
        let mut state = self.state.lock();
        state.maps = maps.clone();
        state.updated_at = timestamp;
        maps
    }

    fn take_refresh_flag(&self) -> bool {
        let mut state = self.state.lock();
        std::mem::replace(&mut state.refresh_pending, false)
    }

    fn load_persisted(&self, respect_ttl: bool) -> Option<(Vec<MapRecord>, i64)> {
        let timestamp = self.store.get_long(KEY_MAPS_TIMESTAMP, 0);
        if respect_ttl {
            let age = now_millis().saturating_sub(timestamp);
            if timestamp <= 0 || age >= self.ttl.as_millis() as i64 {
                return None;
            }
        }

        let data = self.store.get_string(KEY_MAPS_DATA)?;
        match serde_json::from_str::<Vec<MapRecord>>(&data) {
            Ok(maps) if !maps.is_empty() => Some((maps, timestamp)),
            Ok(_) => None,
            Err(e) => {
                error!("Error loading maps from persistent cache: {}", e);
                None
            }
        }
    }

    async fn fetch_from_api(&self) -> Option<Arc<Vec<MapRecord>>> {
        info!("Fetching maps from API (once per foreground)");
        let response = match self.transport.get_catalog().await {
            Ok(response) => response,
            Err(e) => {
                error!("Error fetching maps from API: {}", e);
                return None;
            }
        };
        if !response.is_success() {
            warn!("Failed to fetch maps: HTTP {}", response.status);
            return None;
        }
        if response.body.is_empty() {
            warn!("Maps endpoint returned an empty body");
            return None;
        }

        let maps = match decode_catalog(&response.body) {
            Ok(maps) if !maps.is_empty() => maps,
            Ok(_) => {
                warn!("Maps endpoint returned an empty catalog");
                return None;
            }
            Err(e) => {
                error!("Error parsing maps JSON: {}", e);
                return None;
            }
        };

        info!("Fetched {} maps from API", maps.len());
        Some(self.store_fetched(maps))
    }

    fn store_fetched(&self, maps: Vec<MapRecord>) -> Arc<Vec<MapRecord>> {
        let timestamp = now_millis();
        let maps = Arc::new(maps);
        {
            let mut state = self.state.lock();
            state.maps = maps.clone();
            state.updated_at = timestamp;
        }
        match serde_json::to_string(&*maps) {
            Ok(json) => {
                self.store.put_string(KEY_MAPS_DATA, &json);
                self.store.put_long(KEY_MAPS_TIMESTAMP, timestamp);
                debug!("Saved {} maps to persistent cache", maps.len());
            }
            Err(e) => error!("Error saving maps to persistent cache: {}", e),
        }
        maps
    }
}

pub fn find_map<'a>(maps: &'a [MapRecord], map_id: &str) -> Option<&'a MapRecord> {
    maps.iter().find(|m| m.path == map_id)
}

/// Fills `map_image` and `map_name` from the first catalog entry whose path
/// equals the server's map id.
pub fn join_map(server: &mut ServerRecord, maps: &[MapRecord]) {
    match find_map(maps, &server.map_id) {
        Some(map) => {
            server.map_image = Some(map.image.clone());
            server.map_name = map.name.clone();
        }
        None => {
            server.map_image = None;
            server.map_name = UNKNOWN_MAP.to_string();
        }
    }
}
