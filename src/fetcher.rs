// src/fetcher.rs
use log::{error, info, warn};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::cache::{join_map, MapCatalogCache};
use crate::config::Config;
use crate::decode::decode_roster_lenient;
use crate::error::DirectoryError;
use crate::models::ServerRecord;
use crate::transport::Transport;
use crate::utils::now_millis;

/// Last roster that came back non-empty.
#[derive(Debug, Clone, Default)]
pub struct RosterSnapshot {
    pub servers: Arc<Vec<ServerRecord>>,
    pub fetched_at: i64,
}

pub struct RosterFetcher {
    transport: Arc<dyn Transport>,
    catalog: Arc<MapCatalogCache>,
    page_size: usize,
    max_pages: usize,
    last_good: Mutex<RosterSnapshot>,
}

impl RosterFetcher {
    pub fn new(transport: Arc<dyn Transport>, catalog: Arc<MapCatalogCache>, config: &Config) -> Self {
        Self::with_paging(transport, catalog, config.page_size, config.max_pages)
    }

    pub fn with_paging(
        transport: Arc<dyn Transport>,
        catalog: Arc<MapCatalogCache>,
        page_size: usize,
        max_pages: usize,
    ) -> Self {
        Self {
            transport,
            catalog,
            page_size: page_size.max(1),
            max_pages: max_pages.max(1),
            last_good: Mutex::new(RosterSnapshot::default()),
        }
    }

    pub fn catalog(&self) -> &Arc<MapCatalogCache> {
        &self.catalog
    }

    pub fn last_snapshot(&self) -> RosterSnapshot {
        self.last_good.lock().clone()
    }

    /// Fetches every roster page. Any non-empty result replaces the snapshot,
    /// even when a later page failed. An empty result falls back to the
    /// snapshot unless `force_refresh` is set.
    pub async fn fetch_all(&self, force_refresh: bool) -> Vec<ServerRecord> {
        let mut servers: Vec<ServerRecord> = Vec::new();
        let mut last_error: Option<DirectoryError> = None;

        info!("Starting to fetch all servers");
        for page in 0..self.max_pages {
            let start = page * self.page_size;
            info!("Fetching batch {}, starting at index {}", page + 1, start);

            match self.fetch_page(start).await {
                Ok(batch) => {
                    let count = batch.len();
                    info!("Batch {} returned {} servers", page + 1, count);
                    servers.extend(batch);
                    if count < self.page_size {
                        info!("Batch {} returned fewer than {} servers, stopping", page + 1, self.page_size);
                        break;
                    }
                }
                Err(DirectoryError::EmptyPage) => {
                    info!("Batch {} returned no servers, stopping", page + 1);
                    break;
                }
                Err(e) => {
                    error!("Batch {} failed: {}", page + 1, e);
                    last_error = Some(e);
                    break;
                }
            }
        }

        info!("Total servers fetched: {}", servers.len());
        if !servers.is_empty() {
            let mut snapshot = self.last_good.lock();
            *snapshot = RosterSnapshot {
                servers: Arc::new(servers.clone()),
                fetched_at: now_millis(),
            };
            info!("Updated servers cache with {} servers", servers.len());
            return servers;
        }

        let reason = last_error.map(|e| e.to_string()).unwrap_or_else(|| "no data".to_string());
        let snapshot = self.last_snapshot();
        if !force_refresh && !snapshot.servers.is_empty() {
            warn!(
                "Fetch returned nothing, using cached servers ({} servers). Reason: {}",
                snapshot.servers.len(),
                reason
            );
            return snapshot.servers.as_ref().clone();
        }

        warn!("No servers available, returning empty list. Reason: {}", reason);
        Vec::new()
    }

    async fn fetch_page(&self, start: usize) -> Result<Vec<ServerRecord>, DirectoryError> {
        let response = self.transport.get_roster(start, self.page_size).await?;
        if !response.is_success() {
            return Err(DirectoryError::Transport { status: response.status });
        }
        if response.body.is_empty() {
            return Err(DirectoryError::EmptyPage);
        }

        let mut batch = decode_roster_lenient(&response.body);
        if batch.is_empty() {
            return Err(DirectoryError::EmptyPage);
        }

        let maps = self.catalog.get_catalog().await;
        for server in batch.iter_mut() {
            join_map(server, &maps);
        }
        Ok(batch)
    }
}
