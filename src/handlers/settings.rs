// src/handlers/settings.rs
use actix_web::{web, HttpResponse};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::transport::HttpTransport;
use crate::utils::RequestError;

#[derive(Deserialize)]
pub struct RegionQuery {
    id: String,
    #[serde(default)]
    lang: String,
}

#[derive(Serialize)]
struct RegionView<'a> {
    id: &'a str,
    url: &'a str,
    label: &'a str,
}

/// Points the upstream transport at another configured region.
pub async fn select_region(
    config: web::Data<Config>,
    transport: web::Data<HttpTransport>,
    query: web::Query<RegionQuery>,
) -> Result<HttpResponse, RequestError> {
    let region = match config.api_regions.iter().find(|r| r.id == query.id) {
        Some(region) => region,
        None => {
            warn!("Unknown API region requested: {}", query.id);
            return Err(RequestError::UnknownRegion(query.id.clone()));
        }
    };

    transport.set_base_url(&region.url);
    info!("Switched API endpoint to {} ({})", region.id, transport.base_url());

    Ok(HttpResponse::Ok().json(RegionView {
        id: &region.id,
        url: &region.url,
        label: region.label(&query.lang),
    }))
}
