/*
 * Responsibility
 * - middlware の公開インターフェース
 * - 各 module の apply(router, ...) を app.rs から呼ぶ
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
