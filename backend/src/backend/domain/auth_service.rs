//! Token issuance and the authorization gate.
//!
//! The [`Authenticator`] turns an account number into an opaque signed
//! token and back. The [`AuthGate`] binds an inbound token to the account
//! addressed by the request path and enforces that callers only ever act
//! on their own account. Every account-scoped handler runs the gate before
//! touching any state.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::backend::storage::{AccountStore, StorageError};

#[derive(Debug, Error)]
pub enum AuthError {
    /// The token is missing, malformed, expired, or carries a bad signature.
    #[error("not authenticated")]
    Unauthenticated,
    /// The token is valid but does not belong to the addressed account.
    #[error("permission denied")]
    Forbidden,
    #[error("authorization check failed: {0}")]
    Storage(StorageError),
}

/// Claims embedded in an issued token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account number of the authenticated caller
    pub account_number: i64,
    /// Expiration (unix seconds)
    pub exp: i64,
    /// Issued at (unix seconds)
    pub iat: i64,
}

/// Issues and decodes HS256 tokens with an embedded account number and
/// expiry. The token payload is opaque to clients.
pub struct Authenticator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl Authenticator {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Issue a token for an account number.
    pub fn issue(&self, account_number: i64) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            account_number,
            exp: now + self.ttl_secs,
            iat: now,
        };

        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Decode and validate a token. Expiry, signature, and shape failures
    /// all collapse to `Unauthenticated`.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("token rejected: {e}");
                AuthError::Unauthenticated
            })
    }
}

/// Binds a token to the account addressed by the request path.
#[derive(Clone)]
pub struct AuthGate {
    authenticator: Arc<Authenticator>,
    accounts: Arc<dyn AccountStore>,
}

impl AuthGate {
    pub fn new(authenticator: Arc<Authenticator>, accounts: Arc<dyn AccountStore>) -> Self {
        Self { authenticator, accounts }
    }

    /// Resolve the caller's identity and check it against the account the
    /// request addresses. Returns the authenticated account number for
    /// downstream use.
    ///
    /// A missing target account reads as `Forbidden` rather than a
    /// not-found so unauthenticated probing cannot map out which ids exist.
    pub async fn authorize(&self, token: &str, target_account_id: i64) -> Result<i64, AuthError> {
        let claims = self.authenticator.decode(token)?;

        let account = match self.accounts.account_by_id(target_account_id).await {
            Ok(account) => account,
            Err(StorageError::NotFound) => return Err(AuthError::Forbidden),
            Err(e) => return Err(AuthError::Storage(e)),
        };

        if account.number != claims.account_number {
            return Err(AuthError::Forbidden);
        }

        Ok(account.number)
    }
}
