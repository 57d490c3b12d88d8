/*
 * Responsibility
 * - URL 構造を定義 (/, /health, /api/auth, /api/pdf, /api/protected)
 * - Bearer が必要な範囲は access::apply (route_layer) をここで掛ける
 * - GET / と 404 で返す route 一覧 (ROUTES) もここで一元管理
 */
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use serde::Serialize;

use crate::api::handlers::{
    auth::{login, register, verify},
    health::health,
    not_found::not_found,
    pdf::{contar_paginas, pagina_pdf},
    protected::protected,
    root::root,
};
use crate::config::Config;
use crate::middleware::auth::access;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RouteInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub auth: bool,
    pub description: &'static str,
}

pub const ROUTES: &[RouteInfo] = &[
    RouteInfo {
        method: "GET",
        path: "/",
        auth: false,
        description: "API directory",
    },
    RouteInfo {
        method: "GET",
        path: "/health",
        auth: false,
        description: "health check",
    },
    RouteInfo {
        method: "POST",
        path: "/api/auth/login",
        auth: false,
        description: "exchange {username, password} for a bearer token",
    },
    RouteInfo {
        method: "POST",
        path: "/api/auth/register",
        auth: false,
        description: "create a user from {username, password}",
    },
    RouteInfo {
        method: "GET",
        path: "/api/auth/verify",
        auth: true,
        description: "check the bearer token",
    },
    RouteInfo {
        method: "POST",
        path: "/api/pdf/contar_paginas",
        auth: true,
        description: "count pages of the PDF in multipart field `archivo`",
    },
    RouteInfo {
        method: "POST",
        path: "/api/pdf/pagina_pdf",
        auth: true,
        description: "download page `pagina` (1-based) of the PDF in field `archivo`",
    },
    RouteInfo {
        method: "GET",
        path: "/api/protected",
        auth: true,
        description: "echo the authenticated identity",
    },
];

pub fn routes(state: AppState, config: &Config) -> Router<AppState> {
    let auth_public = Router::new()
        .route("/login", post(login))
        .route("/register", post(register));
    let auth_protected = access::apply(Router::new().route("/verify", get(verify)), state.clone());

    let pdf = access::apply(
        Router::new()
            .route("/contar_paginas", post(contar_paginas))
            .route("/pagina_pdf", post(pagina_pdf)),
        state.clone(),
    )
    // Multipart is capped at 2 MB by default.
    .layer(DefaultBodyLimit::max(config.max_upload_bytes));

    let protected = access::apply(
        Router::new().route("/api/protected", get(protected)),
        state,
    );

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api/auth", auth_public.merge(auth_protected))
        .nest("/api/pdf", pdf)
        .merge(protected)
        .fallback(not_found)
        // Known path, wrong method: same 404 body instead of axum's empty 405.
        .method_not_allowed_fallback(not_found)
}
