// src/handlers/servers.rs
use actix_web::{web, HttpRequest, HttpResponse};
use log::{debug, error};
use serde::Deserialize;

use super::ServerListLimiter;
use crate::fetcher::RosterFetcher;
use crate::models::{ServerRecord, ServerView};
use crate::search::search;
use crate::utils::{peer_ip, RequestError};

#[derive(Deserialize)]
pub struct ServerListQuery {
    #[serde(default)]
    q: String,
    #[serde(default)]
    force: bool,
}

pub async fn get_servers(
    fetcher: web::Data<RosterFetcher>,
    rate_limiter: web::Data<ServerListLimiter>,
    req: HttpRequest,
    query: web::Query<ServerListQuery>,
) -> Result<HttpResponse, RequestError> {
    let peer_ip = peer_ip(&req)?;

    if rate_limiter.check_key(&peer_ip).is_err() {
        error!("Rate limit exceeded for server list for ip: {}", peer_ip);
        return Err(RequestError::RateLimitExceeded);
    }

    let servers = fetcher.fetch_all(query.force).await;
    let matches = search(&servers, &query.q);
    debug!("Server list for {}: {} of {} servers match {:?}", peer_ip, matches.len(), servers.len(), query.q);

    Ok(HttpResponse::Ok().json(views(&matches)))
}

/// Serves the last good roster without touching the network.
pub async fn get_cached_servers(
    fetcher: web::Data<RosterFetcher>,
    query: web::Query<ServerListQuery>,
) -> HttpResponse {
    let snapshot = fetcher.last_snapshot();
    HttpResponse::Ok().json(views(&search(&snapshot.servers, &query.q)))
}

fn views(servers: &[ServerRecord]) -> Vec<ServerView<'_>> {
    servers.iter().map(ServerView::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MapCatalogCache;
    use crate::handlers::configure;
    use crate::models::ServerRecord;
    use crate::storage::MemoryStore;
    use crate::testing::{roster_page, ScriptedTransport};
    use crate::transport::TransportResponse;
    use actix_web::{test, App};
    use governor::Quota;
    use std::num::NonZeroU32;
    use std::sync::Arc;
    use std::time::Duration;

    fn app_data(transport: &Arc<ScriptedTransport>, burst: u32) -> (web::Data<RosterFetcher>, web::Data<ServerListLimiter>) {
        let catalog = Arc::new(MapCatalogCache::new(
            transport.clone(),
            Arc::new(MemoryStore::new()),
            Duration::from_secs(60),
        ));
        let fetcher = RosterFetcher::with_paging(transport.clone(), catalog, 100, 10);
        let quota = Quota::per_hour(NonZeroU32::new(1).unwrap()).allow_burst(NonZeroU32::new(burst).unwrap());
        (web::Data::new(fetcher), web::Data::new(ServerListLimiter::keyed(quota)))
    }

    #[actix_web::test]
    async fn filters_fetched_roster() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_roster(Ok(TransportResponse::ok(roster_page(0, 3))));
        let (fetcher, limiter) = app_data(&transport, 5);
        let app = test::init_service(App::new().app_data(fetcher).app_data(limiter).configure(configure)).await;

        let req = test::TestRequest::get()
            .uri("/servers?q=Server%201")
            .peer_addr("127.0.0.1:5000".parse().unwrap())
            .to_request();
        let servers: Vec<ServerRecord> = test::call_and_read_body_json(&app, req).await;
        // OR semantics: "Server" alone matches every entry.
        assert_eq!(servers.len(), 3);

        let req = test::TestRequest::get()
            .uri("/servers/cached?q=1001")
            .to_request();
        let cached: Vec<ServerRecord> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].name, "Server 1");
    }

    #[actix_web::test]
    async fn server_list_carries_derived_fields() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_roster(Ok(TransportResponse::ok(roster_page(0, 2))));
        let (fetcher, limiter) = app_data(&transport, 5);
        let app = test::init_service(App::new().app_data(fetcher).app_data(limiter).configure(configure)).await;

        let req = test::TestRequest::get()
            .uri("/servers")
            .peer_addr("127.0.0.1:5000".parse().unwrap())
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body[0]["isOnline"], false);
        assert_eq!(body[1]["name"], "Server 1");
        assert_eq!(body[1]["isOnline"], true);
        assert_eq!(body[1]["playerSlotStatus"], "1/16");
        assert_eq!(body[1]["serverLocation"], "Unknown");
        assert_eq!(body[1]["displayMode"], "COOP");
    }

    #[actix_web::test]
    async fn rate_limits_per_client() {
        let transport = Arc::new(ScriptedTransport::new());
        let (fetcher, limiter) = app_data(&transport, 1);
        let app = test::init_service(App::new().app_data(fetcher).app_data(limiter).configure(configure)).await;

        let first = test::TestRequest::get()
            .uri("/servers")
            .peer_addr("127.0.0.1:5000".parse().unwrap())
            .to_request();
        assert!(test::call_service(&app, first).await.status().is_success());

        let second = test::TestRequest::get()
            .uri("/servers")
            .peer_addr("127.0.0.1:5001".parse().unwrap())
            .to_request();
        assert_eq!(test::call_service(&app, second).await.status(), 429);
    }
}
