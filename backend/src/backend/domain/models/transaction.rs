use chrono::{DateTime, Utc};

/// One committed, immutable ledger entry. Sender and receiver are account
/// numbers rather than surrogate ids so history stays meaningful even
/// after an account is deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub sender: i64,
    pub receiver: i64,
    pub amount: i64,
    /// Stamped at the moment the balance change was durably committed
    pub time: DateTime<Utc>,
}

/// A ledger entry awaiting its storage-assigned id.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub sender: i64,
    pub receiver: i64,
    pub amount: i64,
    pub time: DateTime<Utc>,
}

impl TransactionDraft {
    pub fn new(sender: i64, receiver: i64, amount: i64, time: DateTime<Utc>) -> Self {
        Self { sender, receiver, amount, time }
    }
}
