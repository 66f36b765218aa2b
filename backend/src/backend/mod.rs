//! # Backend Module
//!
//! Contains all non-transport logic for the bank and the wiring that
//! brings it together.
//!
//! ## Architecture
//!
//! The backend follows a layered architecture:
//! ```text
//! HTTP clients
//!     ↓
//! IO Layer (REST handlers, DTO mapping)
//!     ↓
//! Domain Layer (account service, transfer engine, auth gate)
//!     ↓
//! Storage Layer (SQLite ledger store)
//! ```
//!
//! ## Key Responsibilities
//!
//! - Initialize and configure the application state
//! - Set up the REST API router with CORS
//! - Inject the store, verifier, and authenticator into the services so
//!   nothing reaches for process-wide singletons

pub mod domain;
pub mod io;
pub mod storage;

#[cfg(test)]
pub mod test_utils;

use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::backend::domain::models::account::CredentialPolicy;
use crate::backend::domain::secrets::{BcryptVerifier, SecretVerifier};
use crate::backend::domain::{AccountService, AuthGate, Authenticator, TransferService};
use crate::backend::io::rest::{account_apis, transfer_apis};
use crate::backend::storage::{
    AccountRepository, AccountStore, DbConnection, TransactionRepository, TransactionStore,
};
use crate::config::AppConfig;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
    pub transfer_service: TransferService,
    pub auth: AuthGate,
}

impl AppState {
    /// Wire the services around one store, verifier, and authenticator.
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        transactions: Arc<dyn TransactionStore>,
        verifier: Arc<dyn SecretVerifier>,
        authenticator: Arc<Authenticator>,
        policy: CredentialPolicy,
        transfer_retry_limit: u32,
    ) -> Self {
        let account_service = AccountService::new(
            accounts.clone(),
            transactions.clone(),
            verifier.clone(),
            authenticator.clone(),
            policy,
        );
        let transfer_service =
            TransferService::new(accounts.clone(), transactions, verifier, transfer_retry_limit);
        let auth = AuthGate::new(authenticator, accounts);

        Self { account_service, transfer_service, auth }
    }
}

/// Connect to storage and build the application state from configuration.
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database");
    let db = DbConnection::new(&config.database_url).await?;

    let accounts: Arc<dyn AccountStore> = Arc::new(AccountRepository::new(db.clone()));
    let transactions: Arc<dyn TransactionStore> = Arc::new(TransactionRepository::new(db));
    let verifier: Arc<dyn SecretVerifier> = Arc::new(BcryptVerifier::new());
    let authenticator = Arc::new(Authenticator::new(&config.jwt_secret, config.token_ttl_secs));

    let policy = CredentialPolicy {
        min_password_length: config.min_password_length,
        require_pin_digits: config.require_pin_digits,
    };

    Ok(AppState::new(
        accounts,
        transactions,
        verifier,
        authenticator,
        policy,
        config.transfer_retry_limit,
    ))
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/accounts",
            post(account_apis::create_account).get(account_apis::list_accounts),
        )
        .route("/api/login", post(account_apis::login))
        .route(
            "/api/accounts/:id",
            get(account_apis::get_account)
                .put(account_apis::update_account)
                .delete(account_apis::delete_account),
        )
        .route("/api/accounts/:id/transfer", post(transfer_apis::transfer))
        .route(
            "/api/accounts/:id/transactions",
            get(transfer_apis::list_transactions),
        )
        .layer(cors)
        .with_state(state)
}
