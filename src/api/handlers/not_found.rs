/*
 * Responsibility
 * - router の fallback: 404 + 利用可能な route 一覧
 */
use axum::{
    Json,
    http::{Method, StatusCode, Uri},
};
use serde::Serialize;

use crate::api::routes::{ROUTES, RouteInfo};

#[derive(Debug, Serialize)]
pub struct NotFoundResponse {
    pub error: &'static str,
    pub message: String,
    pub routes: &'static [RouteInfo],
}

pub async fn not_found(method: Method, uri: Uri) -> (StatusCode, Json<NotFoundResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            error: "NOT_FOUND",
            message: format!("route {} {} not found", method, uri.path()),
            routes: ROUTES,
        }),
    )
}
