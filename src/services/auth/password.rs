//! bcrypt wrapper.
//!
//! Hashing is CPU-bound by design of the algorithm, so both operations run on
//! the blocking pool instead of the async executor.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error("hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Clone, Copy, Debug)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Produce a salted bcrypt hash (`$2b$<cost>$...`).
    pub async fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let plaintext = plaintext.to_owned();
        let cost = self.cost;
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost)).await??;
        Ok(hashed)
    }

    /// A malformed stored hash is reported as an error, not as a mismatch.
    pub async fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, PasswordError> {
        let plaintext = plaintext.to_owned();
        let hash = hash.to_owned();
        let ok = tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &hash)).await??;
        Ok(ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_then_verify() {
        let hasher = PasswordHasher::new(4);

        let hashed = hasher.hash("secret1").await.unwrap();
        assert_ne!(hashed, "secret1");
        assert!(hashed.starts_with("$2"));

        assert!(hasher.verify("secret1", &hashed).await.unwrap());
        assert!(!hasher.verify("secret2", &hashed).await.unwrap());
    }

    #[tokio::test]
    async fn hashes_are_salted() {
        let hasher = PasswordHasher::new(4);
        let a = hasher.hash("same").await.unwrap();
        let b = hasher.hash("same").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn uses_configured_cost() {
        let hasher = PasswordHasher::new(5);
        let hashed = hasher.hash("pw").await.unwrap();
        assert_eq!(&hashed[4..6], "05");
    }

    #[tokio::test]
    async fn malformed_hash_is_an_error() {
        let hasher = PasswordHasher::new(4);
        assert!(hasher.verify("pw", "not-a-bcrypt-hash").await.is_err());
    }
}
