// src/testing.rs
//! Scripted transport shared by the unit tests.
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::DirectoryError;
use crate::transport::{Transport, TransportResponse};

type Reply = Result<TransportResponse, DirectoryError>;

#[derive(Default)]
pub struct ScriptedTransport {
    roster: Mutex<VecDeque<Reply>>,
    catalog: Mutex<VecDeque<Reply>>,
    catalog_delay: Option<Duration>,
    pub roster_calls: Mutex<Vec<(usize, usize)>>,
    pub catalog_calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog_delay(mut self, delay: Duration) -> Self {
        self.catalog_delay = Some(delay);
        self
    }

    pub fn push_roster(&self, reply: Reply) {
        self.roster.lock().push_back(reply);
    }

    pub fn push_catalog(&self, reply: Reply) {
        self.catalog.lock().push_back(reply);
    }

    pub fn catalog_call_count(&self) -> usize {
        self.catalog_calls.load(Ordering::SeqCst)
    }

    pub fn roster_call_count(&self) -> usize {
        self.roster_calls.lock().len()
    }
}

fn exhausted() -> Reply {
    Err(DirectoryError::Connection("connection refused".to_string()))
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get_roster(&self, start: usize, size: usize) -> Reply {
        self.roster_calls.lock().push((start, size));
        let reply = self.roster.lock().pop_front();
        reply.unwrap_or_else(exhausted)
    }

    async fn get_catalog(&self) -> Reply {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.catalog_delay {
            tokio::time::sleep(delay).await;
        }
        let reply = self.catalog.lock().pop_front();
        reply.unwrap_or_else(exhausted)
    }
}

/// Builds a roster page with `count` servers numbered from `first`.
pub fn roster_page(first: usize, count: usize) -> String {
    let mut xml = String::from("<result>");
    for n in first..first + count {
        xml.push_str(&format!(
            "<server><name>Server {n}</name><address>10.0.0.{octet}</address><port>{port}</port>\
             <map_id>media/packages/vanilla/maps/map{map}</map_id><current_players>{n}</current_players>\
             <max_players>16</max_players><mode>COOP</mode></server>",
            n = n,
            octet = n % 256,
            port = 1000 + n,
            map = n % 3 + 1,
        ));
    }
    xml.push_str("</result>");
    xml
}
