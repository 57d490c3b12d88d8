//! session token (HS256 JWT) 検証 → AuthCtx を extensions に入れる
//!
//! - `Authorization: Bearer <token>` 以外の形 (欠落/scheme 違い/空 token) は 401 MissingToken
//! - 署名不正・期限切れ・壊れた token は 403 InvalidToken (原因は log のみに残す)
//! - handler は `AuthCtxExtractor` で型付きの AuthCtx を受け取る

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// 保護したい sub-router に認証を掛ける。
///
/// 例：
/// ```ignore
/// let pdf = middleware::auth::access::apply(pdf_routes(), state.clone());
/// app = app.nest("/api/pdf", pdf);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    // route_layer: マッチしない path は 404 fallback に流す
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

/// Pull the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::MissingToken)?;

    auth.strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or(AppError::MissingToken)
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())?;

    let verified = match state.tokens.verify(token) {
        Ok(verified) => verified,
        Err(err) => {
            tracing::warn!(error = %err, "session token verification failed");
            return Err(AppError::InvalidToken);
        }
    };

    let auth_ctx = AuthCtx::new(verified.user_id, verified.username);

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn rejects_missing_or_malformed_header() {
        for value in ["", "Bearer", "Bearer ", "bearer abc", "Basic abc", "abc"] {
            let err = bearer_token(&headers_with(value)).unwrap_err();
            assert!(matches!(err, AppError::MissingToken), "value: {value:?}");
        }
        assert!(matches!(
            bearer_token(&HeaderMap::new()).unwrap_err(),
            AppError::MissingToken
        ));
    }
}
