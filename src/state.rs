/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - users: Arc<dyn UserStore>, passwords: PasswordHasher, tokens: TokenService など
 * - Clone 前提で持つ (内部は Arc/Copy)
 */
use std::sync::Arc;
use std::time::Instant;

use crate::repos::user_repo::UserStore;
use crate::services::auth::{PasswordHasher, TokenService};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub passwords: PasswordHasher,
    pub tokens: Arc<TokenService>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        passwords: PasswordHasher,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
            started_at: Instant::now(),
        }
    }
}
