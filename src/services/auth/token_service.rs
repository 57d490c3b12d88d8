use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::{error::Error as StdError, fmt};
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;
use crate::repos::user_repo::UserRow;
use crate::services::auth::jwt::JwtCodec;

/// Session token claims.
///
/// `id` / `username` identify the user; `iat` / `exp` are unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub id: i64,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Errors returned by session-token verification.
///
/// Callers surface every variant as the same `InvalidToken`; the split only
/// exists for logs.
#[derive(Debug)]
pub enum TokenError {
    Jwt(jsonwebtoken::errors::Error),
    EmptyClaim(&'static str),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jwt(e) => write!(f, "jwt verification failed: {}", e),
            Self::EmptyClaim(name) => write!(f, "empty '{}' claim", name),
        }
    }
}

impl StdError for TokenError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Jwt(e) => Some(e),
            _ => None,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::Jwt(e)
    }
}

/// Token as handed back to the client after login.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Identity extracted from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub user_id: i64,
    pub username: String,
}

#[derive(Clone, Debug)]
pub struct TokenService {
    jwt: JwtCodec,
    ttl_seconds: u64,
}

impl TokenService {
    pub fn new(jwt: JwtCodec, ttl_seconds: u64) -> Self {
        Self { jwt, ttl_seconds }
    }

    /// Issue a session token for `user`, valid for the configured TTL.
    pub fn issue(&self, user: &UserRow) -> Result<IssuedToken, AppError> {
        self.issue_at(user, Utc::now())
    }

    pub(crate) fn issue_at(&self, user: &UserRow, now: DateTime<Utc>) -> Result<IssuedToken, AppError> {
        let expires_at = now + ChronoDuration::seconds(self.ttl_seconds as i64);

        let claims = SessionClaims {
            id: user.id,
            username: user.username.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        debug!(
            user_id = user.id,
            ttl_seconds = self.ttl_seconds,
            expires_at = %expires_at,
            "issuing session token"
        );

        Ok(IssuedToken {
            token: self.jwt.sign(&claims)?,
            expires_at,
        })
    }

    /// Verify signature + expiry and convert the claims into the identity handlers use.
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        let claims: SessionClaims = self.jwt.verify(token)?;

        if claims.username.trim().is_empty() {
            return Err(TokenError::EmptyClaim("username"));
        }

        Ok(VerifiedToken {
            user_id: claims.id,
            username: claims.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> TokenService {
        TokenService::new(JwtCodec::new(secret, 0), 86_400)
    }

    fn alice() -> UserRow {
        UserRow {
            id: 2,
            username: "alice".to_string(),
            password_hash: "irrelevant".to_string(),
        }
    }

    #[test]
    fn issued_token_round_trips_identity() {
        let tokens = service("test-secret");
        let issued = tokens.issue(&alice()).unwrap();

        let verified = tokens.verify(&issued.token).unwrap();
        assert_eq!(
            verified,
            VerifiedToken {
                user_id: 2,
                username: "alice".to_string()
            }
        );
    }

    #[test]
    fn expiry_is_ttl_after_issuance() {
        let tokens = service("test-secret");
        let now = Utc::now();
        let issued = tokens.issue_at(&alice(), now).unwrap();
        assert_eq!((issued.expires_at - now).num_seconds(), 86_400);
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = service("test-secret");
        let issued = tokens
            .issue_at(&alice(), Utc::now() - ChronoDuration::hours(25))
            .unwrap();

        let err = tokens.verify(&issued.token).unwrap_err();
        assert!(matches!(err, TokenError::Jwt(_)));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let issued = service("secret-a").issue(&alice()).unwrap();
        assert!(service("secret-b").verify(&issued.token).is_err());
    }

    #[test]
    fn truncated_or_garbage_token_is_rejected() {
        let tokens = service("test-secret");
        let issued = tokens.issue(&alice()).unwrap();
        let truncated = &issued.token[..issued.token.len() - 1];

        assert!(tokens.verify(truncated).is_err());
        assert!(tokens.verify("not.a.jwt").is_err());
        assert!(tokens.verify("").is_err());
    }
}
