//! Shared test infrastructure: a fully wired backend over a unique
//! in-memory database, plus the out-of-band credit fixture the transfer
//! scenarios need (account creation always starts at zero).

use std::sync::Arc;

use crate::backend::domain::models::account::CredentialPolicy;
use crate::backend::domain::secrets::{BcryptVerifier, SecretVerifier};
use crate::backend::domain::Authenticator;
use crate::backend::storage::{AccountRepository, DbConnection, TransactionRepository};
use crate::backend::AppState;

pub struct TestBackend {
    pub state: AppState,
    pub db: DbConnection,
}

impl TestBackend {
    pub async fn new() -> Self {
        let db = DbConnection::init_test().await.unwrap();
        let accounts = Arc::new(AccountRepository::new(db.clone()));
        let transactions = Arc::new(TransactionRepository::new(db.clone()));
        // Minimum bcrypt cost keeps the suite fast while exercising the
        // real hashing path
        let verifier: Arc<dyn SecretVerifier> = Arc::new(BcryptVerifier::with_cost(4));
        let authenticator = Arc::new(Authenticator::new("test-secret", 900));

        let state = AppState::new(
            accounts,
            transactions,
            verifier,
            authenticator,
            CredentialPolicy::default(),
            3,
        );

        Self { state, db }
    }

    /// Credit an account out-of-band, bypassing the transfer engine.
    pub async fn credit(&self, id: i64, amount: i64) {
        sqlx::query("UPDATE accounts SET balance = balance + ? WHERE id = ?")
            .bind(amount)
            .bind(id)
            .execute(self.db.pool())
            .await
            .unwrap();
    }
}

pub async fn test_state() -> AppState {
    TestBackend::new().await.state
}
