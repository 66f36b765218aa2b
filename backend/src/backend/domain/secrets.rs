//! Secret hashing and verification capability.
//!
//! Passwords and PINs never reach storage or logs in plaintext; they pass
//! through a [`SecretVerifier`] exactly once at creation (hash) and at
//! check time (verify). The trait is injected into the entities and
//! services so tests can substitute a cheap double for bcrypt.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("credential hashing failed: {0}")]
pub struct SecretError(String);

/// One-way credential capability: hash on the way in, verify on the way
/// back. There is no decryption path.
#[async_trait]
pub trait SecretVerifier: Send + Sync {
    /// Hash a plaintext secret into a storable credential.
    async fn hash(&self, plaintext: &str) -> Result<String, SecretError>;

    /// Check a plaintext secret against a stored credential. A mismatch is
    /// an ordinary `false`, never an error.
    async fn verify(&self, plaintext: &str, credential: &str) -> bool;
}

/// bcrypt-backed verifier. Hashing and verification are CPU-bound, so both
/// run on the blocking pool instead of stalling the async runtime.
pub struct BcryptVerifier {
    cost: u32,
}

impl BcryptVerifier {
    pub fn new() -> Self {
        Self { cost: bcrypt::DEFAULT_COST }
    }

    /// Lower costs are useful in tests; production uses the default.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretVerifier for BcryptVerifier {
    async fn hash(&self, plaintext: &str) -> Result<String, SecretError> {
        let plaintext = plaintext.to_owned();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
            .await
            .map_err(|e| SecretError(e.to_string()))?
            .map_err(|e| SecretError(e.to_string()))
    }

    async fn verify(&self, plaintext: &str, credential: &str) -> bool {
        let plaintext = plaintext.to_owned();
        let credential = credential.to_owned();

        tokio::task::spawn_blocking(move || {
            bcrypt::verify(plaintext, &credential).unwrap_or(false)
        })
        .await
        .unwrap_or(false)
    }
}

/// Transparent verifier for unit tests: credentials are the plaintext with
/// a marker prefix, so assertions stay readable and fast.
#[cfg(test)]
pub struct PlainVerifier;

#[cfg(test)]
#[async_trait]
impl SecretVerifier for PlainVerifier {
    async fn hash(&self, plaintext: &str) -> Result<String, SecretError> {
        Ok(format!("plain:{plaintext}"))
    }

    async fn verify(&self, plaintext: &str, credential: &str) -> bool {
        credential == format!("plain:{plaintext}")
    }
}
