// src/handlers/mod.rs
pub mod highlight;
pub mod lifecycle;
pub mod servers;
pub mod settings;

use actix_web::web;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{clock::DefaultClock, RateLimiter};
use std::net::IpAddr;

pub type ServerListLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/servers", web::get().to(servers::get_servers))
        .route("/servers/cached", web::get().to(servers::get_cached_servers))
        .route("/highlight", web::get().to(highlight::get_highlight))
        .route("/lifecycle/foreground", web::post().to(lifecycle::foreground))
        .route("/settings/region", web::post().to(settings::select_region));
}
