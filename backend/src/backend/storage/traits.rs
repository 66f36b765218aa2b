//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.
//!
//! The domain services hold these traits as trait objects, so tests can
//! substitute doubles that inject duplicate-number collisions, stale-state
//! conflicts, or append failures without touching a real database.

use async_trait::async_trait;

use crate::backend::domain::models::account::{Account, AccountDraft};
use crate::backend::domain::models::transaction::{Transaction, TransactionDraft};
use crate::backend::storage::error::StorageError;

/// One side of an atomic two-row balance write.
///
/// `expected_version` is the version observed when the account was read;
/// the write only applies if the row still carries it.
#[derive(Debug, Clone, Copy)]
pub struct BalanceUpdate {
    pub id: i64,
    pub expected_version: i64,
    pub new_balance: i64,
}

/// Durable storage for accounts.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Persist a new account and return it with its assigned id.
    /// Fails with `DuplicateNumber` if the account number is taken.
    async fn create_account(&self, draft: &AccountDraft) -> Result<Account, StorageError>;

    /// Fetch an account by surrogate id.
    async fn account_by_id(&self, id: i64) -> Result<Account, StorageError>;

    /// Fetch an account by public account number.
    async fn account_by_number(&self, number: i64) -> Result<Account, StorageError>;

    /// One ascending-by-id page of accounts, restartable from any cursor.
    async fn list_accounts(
        &self,
        limit: u32,
        after_id: Option<i64>,
    ) -> Result<Vec<Account>, StorageError>;

    /// Update the display name fields and return the stored row.
    async fn update_names(
        &self,
        id: i64,
        first_name: &str,
        last_name: &str,
    ) -> Result<Account, StorageError>;

    /// Delete an account. Fails with `BalanceNotZero` while it holds funds,
    /// even if a caller forgot to check first.
    async fn delete_account(&self, id: i64) -> Result<(), StorageError>;

    /// Atomic two-row balance write: either both rows are updated or
    /// neither is. Fails with `StaleState` if either row's version moved
    /// since it was read.
    async fn update_balances(
        &self,
        sender: BalanceUpdate,
        receiver: BalanceUpdate,
    ) -> Result<(), StorageError>;
}

/// Append-only storage for ledger entries.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Durably append one ledger entry and return it with its assigned id.
    async fn append_transaction(
        &self,
        draft: &TransactionDraft,
    ) -> Result<Transaction, StorageError>;

    /// All entries where the account is sender or receiver, merged and
    /// ordered by commit time ascending.
    async fn transactions_involving(&self, number: i64) -> Result<Vec<Transaction>, StorageError>;
}
