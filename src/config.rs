use std::env;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

use governor::Quota;
use log::warn;

/// One selectable API endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRegion {
    pub id: String,
    pub url: String,
    pub label_en: String,
    pub label_zh: String,
}

impl ApiRegion {
    fn new(id: &str, url: &str, label_en: &str, label_zh: &str) -> Self {
        Self {
            id: id.to_string(),
            url: url.to_string(),
            label_en: label_en.to_string(),
            label_zh: label_zh.to_string(),
        }
    }

    pub fn label(&self, language: &str) -> &str {
        match language {
            "zh" => &self.label_zh,
            _ => &self.label_en,
        }
    }

    pub fn defaults() -> Vec<ApiRegion> {
        vec![
            ApiRegion::new("china", "https://robin.kreedzt.cn/", "China Mainland", "中国大陆"),
            ApiRegion::new("global", "https://robin.kreedzt.com/", "Global", "全球"),
        ]
    }

    /// Parses `id|url|label_en|label_zh;...`. Malformed entries are skipped;
    /// if nothing usable remains the defaults are returned.
    pub fn parse_list(config: &str) -> Vec<ApiRegion> {
        let regions: Vec<ApiRegion> = config
            .split(';')
            .filter(|entry| !entry.trim().is_empty())
            .filter_map(|entry| {
                let parts: Vec<&str> = entry.split('|').map(str::trim).collect();
                match parts.as_slice() {
                    [id, url, label_en, label_zh] => Some(ApiRegion::new(id, url, label_en, label_zh)),
                    _ => {
                        warn!("Skipping malformed API region entry: {}", entry);
                        None
                    }
                }
            })
            .collect();

        if regions.is_empty() {
            Self::defaults()
        } else {
            regions
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Local API
    pub bind_address: String,
    pub port: u16,

    // Upstream endpoint
    pub api_regions: Vec<ApiRegion>,
    pub api_region_id: String,
    pub api_base_url: Option<String>,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,

    // Roster paging
    pub page_size: usize,
    pub max_pages: usize,
    pub refresh_interval_secs: u64,

    // Map catalog persistence
    pub catalog_ttl_secs: u64,
    pub cache_file: Option<PathBuf>,

    // Rate limiting for the local server list
    pub server_list_period_secs: u64,
    pub server_list_burst_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8080,
            api_regions: ApiRegion::defaults(),
            api_region_id: "global".to_string(),
            api_base_url: None,
            connect_timeout_secs: 30,
            read_timeout_secs: 30,
            page_size: 100,
            max_pages: 10,
            refresh_interval_secs: 30,
            catalog_ttl_secs: 24 * 60 * 60,
            cache_file: None,
            server_list_period_secs: 1,
            server_list_burst_limit: 10,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            port: env_or("PORT", defaults.port),

            api_regions: env::var("API_REGIONS")
                .ok()
                .map(|v| ApiRegion::parse_list(&v))
                .unwrap_or(defaults.api_regions),
            api_region_id: env::var("API_REGION").unwrap_or(defaults.api_region_id),
            api_base_url: env::var("API_BASE_URL").ok().filter(|v| !v.trim().is_empty()),
            connect_timeout_secs: env_or("CONNECT_TIMEOUT_SECS", defaults.connect_timeout_secs),
            read_timeout_secs: env_or("READ_TIMEOUT_SECS", defaults.read_timeout_secs),

            page_size: env_or("PAGE_SIZE", defaults.page_size).max(1),
            max_pages: env_or("MAX_PAGES", defaults.max_pages).max(1),
            refresh_interval_secs: env_or("REFRESH_INTERVAL_SECS", defaults.refresh_interval_secs),

            catalog_ttl_secs: env_or("CATALOG_TTL_SECS", defaults.catalog_ttl_secs),
            cache_file: env::var("CACHE_FILE").ok().map(PathBuf::from),

            server_list_period_secs: env_or("SERVER_LIST_PERIOD_SECS", defaults.server_list_period_secs),
            server_list_burst_limit: env_or("SERVER_LIST_BURST_LIMIT", defaults.server_list_burst_limit),
        }
    }

    /// The selected region, falling back to the first configured one.
    pub fn current_region(&self) -> Option<&ApiRegion> {
        self.api_regions
            .iter()
            .find(|r| r.id == self.api_region_id)
            .or_else(|| self.api_regions.first())
    }

    pub fn base_url(&self) -> String {
        if let Some(url) = &self.api_base_url {
            return url.clone();
        }
        self.current_region()
            .map(|r| r.url.clone())
            .unwrap_or_else(|| "https://robin.kreedzt.com/".to_string())
    }

    pub fn catalog_ttl(&self) -> Duration {
        Duration::from_secs(self.catalog_ttl_secs)
    }

    pub fn server_list_quota(&self) -> Quota {
        let burst = NonZeroU32::new(self.server_list_burst_limit).unwrap_or(NonZeroU32::MIN);
        Quota::with_period(Duration::from_secs(self.server_list_period_secs))
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN))
            .allow_burst(burst)
    }
}
