/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - RepoError / PasswordError / PdfError を統一的に変換
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::password::PasswordError;
use crate::services::pdf::PdfError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    MissingFields(String),
    // Same message for unknown user and wrong password.
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("password must be at least {min_len} characters long")]
    WeakPassword { min_len: usize },
    #[error("username is already taken")]
    UserExists,
    #[error("access token required: send `Authorization: Bearer <token>`")]
    MissingToken,
    #[error("token is invalid or expired")]
    InvalidToken,
    #[error("page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: String, total: u32 },
    #[error("request body is too large")]
    PayloadTooLarge,
    #[error("the PDF could not be processed")]
    PdfReadError,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn missing_fields(message: impl Into<String>) -> Self {
        Self::MissingFields(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingFields(_) | AppError::WeakPassword { .. } => StatusCode::BAD_REQUEST,
            AppError::PageOutOfRange { .. } => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::MissingToken => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken => StatusCode::FORBIDDEN,
            AppError::UserExists => StatusCode::CONFLICT,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::PdfReadError | AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingFields(_) => "MISSING_FIELDS",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::WeakPassword { .. } => "WEAK_PASSWORD",
            AppError::UserExists => "USER_EXISTS",
            AppError::MissingToken => "MISSING_TOKEN",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::PageOutOfRange { .. } => "PAGE_OUT_OF_RANGE",
            AppError::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            AppError::PdfReadError => "PDF_READ_ERROR",
            AppError::Internal => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.code(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => AppError::UserExists,
            RepoError::Db(err) => {
                tracing::error!(error = %err, "credential store failure");
                AppError::Internal
            }
        }
    }
}

impl From<PasswordError> for AppError {
    fn from(e: PasswordError) -> Self {
        tracing::error!(error = %e, "password hashing failure");
        AppError::Internal
    }
}

impl From<PdfError> for AppError {
    fn from(e: PdfError) -> Self {
        match e {
            PdfError::PageOutOfRange { page, total } => AppError::PageOutOfRange {
                page: page.to_string(),
                total,
            },
            PdfError::Load(_) | PdfError::Save(_) => {
                tracing::error!(error = %e, "pdf processing failed");
                AppError::PdfReadError
            }
            PdfError::Worker(_) => {
                tracing::error!(error = %e, "pdf worker failed");
                AppError::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn renders_error_and_message_fields() {
        let (status, body) = body_json(AppError::UserExists).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "USER_EXISTS");
        assert_eq!(body["message"], "username is already taken");
    }

    #[tokio::test]
    async fn token_errors_split_401_and_403() {
        let (status, body) = body_json(AppError::MissingToken).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "MISSING_TOKEN");

        let (status, body) = body_json(AppError::InvalidToken).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn oversized_body_keeps_413() {
        let (status, body) = body_json(AppError::PayloadTooLarge).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"], "PAYLOAD_TOO_LARGE");
    }

    #[test]
    fn repo_conflict_becomes_user_exists() {
        let err: AppError = RepoError::Conflict.into();
        assert!(matches!(err, AppError::UserExists));
    }

    #[test]
    fn pdf_errors_map_to_taxonomy() {
        let err: AppError = PdfError::PageOutOfRange { page: 0, total: 3 }.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "PAGE_OUT_OF_RANGE");

        let load_err = lopdf::Document::load_mem(b"not a pdf").unwrap_err();
        let err: AppError = PdfError::Load(load_err).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "PDF_READ_ERROR");
    }
}
