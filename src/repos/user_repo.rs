/*
 * Responsibility
 * - credential store (users) の抽象と実装
 *   - InMemoryUserStore: プロセス内 (再起動で消える)
 *   - PgUserStore: users テーブル向け SQLx 操作
 * - username の一意性は create 自体で保証する (check-then-insert を上位でやらない)
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tokio::sync::RwLock;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    // Returns the store backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // Case-sensitive exact match.
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRow>, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRow>, RepoError>;

    // Insert a new user.
    //
    // Returns:
    // - Ok(row) with the assigned id
    // - Err(RepoError::Conflict) if the username is already taken
    async fn create(&self, username: &str, password_hash: &str) -> Result<UserRow, RepoError>;
}

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<UserRow>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRow>, RepoError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRow>, RepoError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<UserRow, RepoError> {
        // Check and append under the same write lock.
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == username) {
            return Err(RepoError::Conflict);
        }

        // Ids are never reused: rows are never deleted.
        let row = UserRow {
            id: users.len() as i64 + 1,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };
        users.push(row.clone());
        Ok(row)
    }
}

#[derive(Debug, Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create the `users` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id BIGSERIAL PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRow>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRow>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<UserRow, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let store = InMemoryUserStore::new();

        let admin = store.create("admin", "h1").await.unwrap();
        let alice = store.create("alice", "h2").await.unwrap();

        assert_eq!(admin.id, 1);
        assert_eq!(alice.id, 2);
        assert_eq!(alice.password_hash, "h2");
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let store = InMemoryUserStore::new();
        store.create("alice", "h1").await.unwrap();

        let err = store.create("alice", "h2").await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict));

        // First record is untouched.
        let alice = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(alice.password_hash, "h1");
    }

    #[tokio::test]
    async fn lookup_is_case_sensitive() {
        let store = InMemoryUserStore::new();
        store.create("Alice", "h").await.unwrap();

        assert!(store.find_by_username("alice").await.unwrap().is_none());
        assert!(store.find_by_username("Alice").await.unwrap().is_some());
        // Different case is a different user.
        assert!(store.create("alice", "h").await.is_ok());
    }

    #[tokio::test]
    async fn find_by_id_returns_created_row() {
        let store = InMemoryUserStore::new();
        let created = store.create("bob", "h").await.unwrap();

        assert_eq!(store.find_by_id(created.id).await.unwrap(), Some(created));
        assert_eq!(store.find_by_id(99).await.unwrap(), None);
    }

    #[tokio::test]
    async fn concurrent_registration_admits_one_winner() {
        let store = Arc::new(InMemoryUserStore::new());

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.create("racer", &format!("h{i}")).await
            }));
        }

        let mut ok = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                ok += 1;
            }
        }
        assert_eq!(ok, 1);
    }
}
