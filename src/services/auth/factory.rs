/// Factory: build auth services from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{JwtCodec, PasswordHasher, TokenService};

pub fn build_token_service(config: &Config) -> Arc<TokenService> {
    let jwt = JwtCodec::new(&config.jwt_secret, config.token_leeway_seconds);
    Arc::new(TokenService::new(jwt, config.token_ttl_seconds))
}

pub fn build_password_hasher(config: &Config) -> PasswordHasher {
    PasswordHasher::new(config.bcrypt_cost)
}
