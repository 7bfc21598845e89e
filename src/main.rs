// src/main.rs
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;

use robin_directory::handlers::{self, ServerListLimiter};
use robin_directory::{Config, FileStore, HttpTransport, KeyValueStore, MapCatalogCache, MemoryStore, RosterFetcher};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env();
    let bind = format!("{}:{}", config.bind_address, config.port);

    let transport = HttpTransport::new(&config).map_err(|e| {
        log::error!("Failed to build HTTP client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;
    let transport = web::Data::new(transport);
    info!("Using API endpoint {}", transport.base_url());

    let store: Arc<dyn KeyValueStore> = match &config.cache_file {
        Some(path) => {
            info!("Persisting map catalog to {}", path.display());
            Arc::new(FileStore::open(path))
        }
        None => Arc::new(MemoryStore::new()),
    };

    let catalog = Arc::new(MapCatalogCache::new(transport.clone().into_inner(), store, config.catalog_ttl()));
    let fetcher = web::Data::new(RosterFetcher::new(transport.clone().into_inner(), catalog, &config));

    let server_list_rate_limiter = web::Data::new(ServerListLimiter::keyed(config.server_list_quota()));

    if config.refresh_interval_secs > 0 {
        let fetcher = fetcher.clone().into_inner();
        let period = Duration::from_secs(config.refresh_interval_secs);
        actix_web::rt::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let servers = fetcher.fetch_all(false).await;
                debug!("Background refresh holds {} servers", servers.len());
            }
        });
    }

    let config = web::Data::new(config);

    info!("Starting server on {}", bind);
    HttpServer::new(move || {
        App::new()
            .app_data(fetcher.clone())
            .app_data(server_list_rate_limiter.clone())
            .app_data(config.clone())
            .app_data(transport.clone())
            .configure(handlers::configure)
    })
        .bind(&bind)?
        .run().await
}
