/*
 * Responsibility
 * - handler から呼ばれる service 群
 *   - auth: password hash / session token
 *   - pdf: lopdf 経由の page 操作
 */
pub mod auth;
pub mod pdf;
