/*
 * Responsibility
 * - POST /api/auth/login, POST /api/auth/register, GET /api/auth/verify
 * - DTO validation → store / hasher / token service 呼び出し
 * - 未登録 user と password 不一致は同じ InvalidCredentials を返す
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::{debug, info, warn};

use crate::{
    api::{
        dto::auth::{CredentialsRequest, LoginResponse, RegisterResponse, VerifyResponse},
        extractors::AuthCtxExtractor,
    },
    error::AppError,
    state::AppState,
};

fn json_body(
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<CredentialsRequest, AppError> {
    payload.map(|Json(req)| req).map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            warn!(error = %rejection, "credentials body over limit");
            return AppError::PayloadTooLarge;
        }
        debug!(error = %rejection, "unreadable credentials body");
        AppError::missing_fields("username and password are required")
    })
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let creds = json_body(payload)?.validate()?;

    let Some(user) = state.users.find_by_username(&creds.username).await? else {
        warn!(username = %creds.username, "login rejected: unknown user");
        return Err(AppError::InvalidCredentials);
    };

    if !state
        .passwords
        .verify(&creds.password, &user.password_hash)
        .await?
    {
        warn!(user_id = user.id, "login rejected: wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let issued = state.tokens.issue(&user)?;
    info!(user_id = user.id, "login succeeded");

    Ok(Json(LoginResponse {
        message: "login successful",
        token: issued.token,
        expires_at: issued.expires_at,
        user: user.into(),
    }))
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let creds = json_body(payload)?.validate_for_registration()?;

    // Skip the bcrypt cost for an obvious collision; create() stays authoritative.
    if state.users.find_by_username(&creds.username).await?.is_some() {
        return Err(AppError::UserExists);
    }

    let password_hash = state.passwords.hash(&creds.password).await?;
    let user = state.users.create(&creds.username, &password_hash).await?;
    info!(user_id = user.id, username = %user.username, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "user registered",
            user: user.into(),
        }),
    ))
}

// Only reachable with a valid token; the middleware answers every other case.
pub async fn verify(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        valid: true,
        user: ctx.into(),
    })
}
