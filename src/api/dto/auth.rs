/*
 * Responsibility
 * - auth (login / register / verify) の request/response DTO
 * - validation (必須項目 / password 長) は validate() に持たせる
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::repos::user_repo::UserRow;

pub const MIN_PASSWORD_LEN: usize = 6;

// Fields are optional so that a missing key becomes MissingFields, not a 422.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl CredentialsRequest {
    /// Both fields present and non-empty.
    pub fn validate(self) -> Result<Credentials, AppError> {
        match (self.username, self.password) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Ok(Credentials { username, password })
            }
            _ => Err(AppError::missing_fields("username and password are required")),
        }
    }

    /// `validate()` plus the minimum password length required at registration.
    pub fn validate_for_registration(self) -> Result<Credentials, AppError> {
        let creds = self.validate()?;
        if creds.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::WeakPassword {
                min_len: MIN_PASSWORD_LEN,
            });
        }
        Ok(creds)
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
}

impl From<UserRow> for UserSummary {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
        }
    }
}

impl From<AuthCtx> for UserSummary {
    fn from(ctx: AuthCtx) -> Self {
        Self {
            id: ctx.user_id,
            username: ctx.username,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserSummary,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user: UserSummary,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub user: UserSummary,
}

#[derive(Debug, Serialize)]
pub struct ProtectedResponse {
    pub message: String,
    pub registered: bool,
    pub user: UserSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(username: Option<&str>, password: Option<&str>) -> CredentialsRequest {
        CredentialsRequest {
            username: username.map(str::to_string),
            password: password.map(str::to_string),
        }
    }

    #[test]
    fn missing_or_empty_fields_are_rejected() {
        let cases = [
            req(None, Some("secret1")),
            req(Some("alice"), None),
            req(Some(""), Some("secret1")),
            req(Some("alice"), Some("")),
            req(None, None),
        ];
        for case in cases {
            assert!(matches!(case.validate(), Err(AppError::MissingFields(_))));
        }
    }

    #[test]
    fn short_password_is_weak_only_at_registration() {
        assert!(req(Some("alice"), Some("12345")).validate().is_ok());

        let err = req(Some("alice"), Some("12345"))
            .validate_for_registration()
            .unwrap_err();
        assert!(matches!(err, AppError::WeakPassword { min_len: 6 }));

        assert!(req(Some("alice"), Some("123456")).validate_for_registration().is_ok());
    }

    #[test]
    fn password_length_counts_characters() {
        // 5 characters (10 bytes) vs 6
        assert!(req(Some("a"), Some("ñññññ")).validate_for_registration().is_err());
        assert!(req(Some("a"), Some("ññññññ")).validate_for_registration().is_ok());
    }
}
