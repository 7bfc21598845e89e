// src/handlers/lifecycle.rs
use actix_web::{web, HttpResponse};
use log::info;

use crate::fetcher::RosterFetcher;

/// The presentation layer came to the foreground: allow one catalog refresh.
pub async fn foreground(fetcher: web::Data<RosterFetcher>) -> HttpResponse {
    fetcher.catalog().mark_needs_refresh();
    info!("Foreground activation, map catalog refresh armed");
    HttpResponse::NoContent().finish()
}
