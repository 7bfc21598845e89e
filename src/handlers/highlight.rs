// src/handlers/highlight.rs
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::search::highlight;

#[derive(Deserialize)]
pub struct HighlightQuery {
    text: String,
    #[serde(default)]
    q: String,
}

pub async fn get_highlight(query: web::Query<HighlightQuery>) -> HttpResponse {
    HttpResponse::Ok().json(highlight(&query.text, &query.q))
}
