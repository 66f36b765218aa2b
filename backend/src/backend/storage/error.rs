//! Error taxonomy for the ledger store.
//!
//! Every repository operation returns one of these variants so the domain
//! layer can react to specific outcomes (duplicate numbers, stale reads)
//! without inspecting backend-specific error strings.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// The account number collides with an existing row's unique index.
    #[error("account number already exists")]
    DuplicateNumber,

    /// No row matched the requested id or number.
    #[error("record not found")]
    NotFound,

    /// Deletion refused because the account still holds funds.
    #[error("account balance is not zero")]
    BalanceNotZero,

    /// An optimistic write found the row changed since it was read.
    /// Callers retry from a fresh read; nothing was written.
    #[error("record changed since it was read")]
    StaleState,

    /// The storage backend itself failed.
    #[error("storage backend unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
}

impl StorageError {
    /// Whether a retry from a fresh read can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StorageError::StaleState)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_stale_state_is_retryable() {
        assert!(StorageError::StaleState.is_retryable());
        assert!(!StorageError::DuplicateNumber.is_retryable());
        assert!(!StorageError::NotFound.is_retryable());
        assert!(!StorageError::BalanceNotZero.is_retryable());
    }
}
