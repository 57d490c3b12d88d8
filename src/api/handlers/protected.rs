/*
 * Responsibility
 * - GET /api/protected : 認証済み identity をそのまま返す (middleware の疎通確認用)
 * - registered: token の user が現在の store にまだ存在するか
 *   (in-memory store は再起動で消えるが、token は期限まで有効なまま)
 */
use axum::{Json, extract::State};

use crate::{
    api::{dto::auth::ProtectedResponse, extractors::AuthCtxExtractor},
    error::AppError,
    state::AppState,
};

pub async fn protected(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<ProtectedResponse>, AppError> {
    let registered = state
        .users
        .find_by_id(ctx.user_id)
        .await?
        .is_some_and(|row| row.username == ctx.username);

    Ok(Json(ProtectedResponse {
        message: format!("hello, {}", ctx.username),
        registered,
        user: ctx.into(),
    }))
}
