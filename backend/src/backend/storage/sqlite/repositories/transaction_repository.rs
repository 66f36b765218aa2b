use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::backend::domain::models::transaction::{Transaction, TransactionDraft};
use crate::backend::storage::error::StorageError;
use crate::backend::storage::sqlite::connection::DbConnection;
use crate::backend::storage::traits::TransactionStore;

/// Repository for the append-only transfer ledger.
///
/// Rows are never updated or deleted; the only writes are appends.
#[derive(Clone)]
pub struct TransactionRepository {
    db: DbConnection,
}

impl TransactionRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

fn transaction_from_row(row: &SqliteRow) -> Transaction {
    Transaction {
        id: row.get("id"),
        sender: row.get("sender"),
        receiver: row.get("receiver"),
        amount: row.get("amount"),
        time: row.get("time"),
    }
}

#[async_trait]
impl TransactionStore for TransactionRepository {
    async fn append_transaction(
        &self,
        draft: &TransactionDraft,
    ) -> Result<Transaction, StorageError> {
        let result = sqlx::query(
            r#"
            INSERT INTO transfers (sender, receiver, amount, time)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(draft.sender)
        .bind(draft.receiver)
        .bind(draft.amount)
        .bind(draft.time)
        .execute(self.db.pool())
        .await?;

        Ok(Transaction {
            id: result.last_insert_rowid(),
            sender: draft.sender,
            receiver: draft.receiver,
            amount: draft.amount,
            time: draft.time,
        })
    }

    async fn transactions_involving(&self, number: i64) -> Result<Vec<Transaction>, StorageError> {
        let rows = sqlx::query(
            r#"
            SELECT id, sender, receiver, amount, time
            FROM transfers
            WHERE sender = ? OR receiver = ?
            ORDER BY time ASC, id ASC
            "#,
        )
        .bind(number)
        .bind(number)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(transaction_from_row).collect())
    }
}
