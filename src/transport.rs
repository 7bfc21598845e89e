// src/transport.rs
use async_trait::async_trait;
use log::debug;
use parking_lot::RwLock;
use std::time::Duration;

use crate::config::Config;
use crate::error::DirectoryError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// GET access to the directory endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_roster(&self, start: usize, size: usize) -> Result<TransportResponse, DirectoryError>;
    async fn get_catalog(&self) -> Result<TransportResponse, DirectoryError>;
}

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: RwLock<String>,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self, DirectoryError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.read_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: RwLock::new(normalize_base_url(&config.base_url())),
        })
    }

    /// Switches endpoints; the next request uses the new base.
    pub fn set_base_url(&self, base_url: &str) {
        *self.base_url.write() = normalize_base_url(base_url);
    }

    pub fn base_url(&self) -> String {
        self.base_url.read().clone()
    }

    async fn get(&self, url: String) -> Result<TransportResponse, DirectoryError> {
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(TransportResponse { status, body })
    }
}

fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_roster(&self, start: usize, size: usize) -> Result<TransportResponse, DirectoryError> {
        let url = format!(
            "{}api/server_list?start={}&size={}&names=1",
            self.base_url(),
            start,
            size
        );
        self.get(url).await
    }

    async fn get_catalog(&self) -> Result<TransportResponse, DirectoryError> {
        let url = format!("{}api/maps", self.base_url());
        self.get(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_always_ends_with_slash() {
        assert_eq!(normalize_base_url("https://robin.kreedzt.com"), "https://robin.kreedzt.com/");
        assert_eq!(normalize_base_url(" https://robin.kreedzt.cn/ "), "https://robin.kreedzt.cn/");
    }

    #[test]
    fn base_url_can_be_switched() {
        let transport = HttpTransport::new(&Config::default()).unwrap();
        transport.set_base_url("http://127.0.0.1:9000");
        assert_eq!(transport.base_url(), "http://127.0.0.1:9000/");
    }

    #[test]
    fn success_range() {
        assert!(TransportResponse::ok("").is_success());
        assert!(!TransportResponse { status: 404, body: String::new() }.is_success());
        assert!(!TransportResponse { status: 301, body: String::new() }.is_success());
    }
}
