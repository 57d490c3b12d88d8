/*
 * Responsibility
 * - GET / : API の目次 (routes::ROUTES をそのまま返す)
 */
use axum::Json;
use serde::Serialize;

use crate::api::routes::{ROUTES, RouteInfo};

#[derive(Debug, Serialize)]
pub struct DirectoryResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub endpoints: &'static [RouteInfo],
}

pub async fn root() -> Json<DirectoryResponse> {
    Json(DirectoryResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        endpoints: ROUTES,
    })
}
