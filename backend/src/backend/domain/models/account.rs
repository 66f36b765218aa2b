//! The account entity and its construction rules.

use chrono::{DateTime, Utc};
use rand::Rng;
use thiserror::Error;

use crate::backend::domain::secrets::{SecretError, SecretVerifier};

/// Account numbers are eight digits, drawn uniformly at random. Collisions
/// are handled by the caller retrying account creation.
const NUMBER_RANGE: std::ops::Range<i64> = 10_000_000..100_000_000;

/// Minimum-strength policy for new credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialPolicy {
    pub min_password_length: usize,
    pub require_pin_digits: usize,
}

impl Default for CredentialPolicy {
    fn default() -> Self {
        Self { min_password_length: 8, require_pin_digits: 4 }
    }
}

#[derive(Debug, Error)]
pub enum AccountDraftError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Secret(#[from] SecretError),
}

/// A stored account. Balance is in minor currency units and is never
/// negative; `version` is the optimistic-concurrency stamp bumped by every
/// balance write.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: i64,
    pub number: i64,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub pin_hash: String,
    pub balance: i64,
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Check the login password against the stored credential.
    pub async fn valid_password(&self, verifier: &dyn SecretVerifier, password: &str) -> bool {
        verifier.verify(password, &self.password_hash).await
    }

    /// Check the transfer PIN against the stored credential.
    pub async fn valid_pin(&self, verifier: &dyn SecretVerifier, pin: &str) -> bool {
        verifier.verify(pin, &self.pin_hash).await
    }
}

/// An account awaiting its storage-assigned id.
#[derive(Debug, Clone)]
pub struct AccountDraft {
    pub number: i64,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub pin_hash: String,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl AccountDraft {
    /// Validate the request, hash both secrets, and draw a random account
    /// number. The number may collide with an existing account; the caller
    /// retries with [`AccountDraft::redraw_number`] on a duplicate report.
    pub async fn new(
        first_name: &str,
        last_name: &str,
        password: &str,
        pin: &str,
        policy: &CredentialPolicy,
        verifier: &dyn SecretVerifier,
    ) -> Result<Self, AccountDraftError> {
        if first_name.trim().is_empty() || last_name.trim().is_empty() {
            return Err(AccountDraftError::InvalidInput(
                "first and last name must not be empty".to_string(),
            ));
        }
        if password.chars().count() < policy.min_password_length {
            return Err(AccountDraftError::InvalidInput(format!(
                "password must be at least {} characters",
                policy.min_password_length
            )));
        }
        if pin.len() != policy.require_pin_digits || !pin.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AccountDraftError::InvalidInput(format!(
                "pin must be exactly {} digits",
                policy.require_pin_digits
            )));
        }

        let password_hash = verifier.hash(password).await?;
        let pin_hash = verifier.hash(pin).await?;

        Ok(Self {
            number: draw_number(),
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            password_hash,
            pin_hash,
            balance: 0,
            created_at: Utc::now(),
        })
    }

    /// Draw a fresh number after a collision, keeping the hashed secrets.
    pub fn redraw_number(&mut self) {
        self.number = draw_number();
    }
}

fn draw_number() -> i64 {
    rand::thread_rng().gen_range(NUMBER_RANGE)
}
