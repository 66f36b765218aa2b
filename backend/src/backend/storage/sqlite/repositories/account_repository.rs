use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::backend::domain::models::account::{Account, AccountDraft};
use crate::backend::storage::error::StorageError;
use crate::backend::storage::sqlite::connection::DbConnection;
use crate::backend::storage::traits::{AccountStore, BalanceUpdate};

/// Repository for account rows.
#[derive(Clone)]
pub struct AccountRepository {
    db: DbConnection,
}

impl AccountRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

fn account_from_row(row: &SqliteRow) -> Account {
    Account {
        id: row.get("id"),
        number: row.get("number"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        password_hash: row.get("password_hash"),
        pin_hash: row.get("pin_hash"),
        balance: row.get("balance"),
        version: row.get("version"),
        created_at: row.get("created_at"),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation)
    )
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn create_account(&self, draft: &AccountDraft) -> Result<Account, StorageError> {
        let result = sqlx::query(
            r#"
            INSERT INTO accounts (number, first_name, last_name, password_hash, pin_hash, balance, version, created_at)
            VALUES (?, ?, ?, ?, ?, ?, 0, ?)
            "#,
        )
        .bind(draft.number)
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(&draft.password_hash)
        .bind(&draft.pin_hash)
        .bind(draft.balance)
        .bind(draft.created_at)
        .execute(self.db.pool())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StorageError::DuplicateNumber
            } else {
                StorageError::Unavailable(e)
            }
        })?;

        self.account_by_id(result.last_insert_rowid()).await
    }

    async fn account_by_id(&self, id: i64) -> Result<Account, StorageError> {
        let row = sqlx::query(
            r#"
            SELECT id, number, first_name, last_name, password_hash, pin_hash, balance, version, created_at
            FROM accounts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(account_from_row).ok_or(StorageError::NotFound)
    }

    async fn account_by_number(&self, number: i64) -> Result<Account, StorageError> {
        let row = sqlx::query(
            r#"
            SELECT id, number, first_name, last_name, password_hash, pin_hash, balance, version, created_at
            FROM accounts
            WHERE number = ?
            "#,
        )
        .bind(number)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(account_from_row).ok_or(StorageError::NotFound)
    }

    async fn list_accounts(
        &self,
        limit: u32,
        after_id: Option<i64>,
    ) -> Result<Vec<Account>, StorageError> {
        let rows = sqlx::query(
            r#"
            SELECT id, number, first_name, last_name, password_hash, pin_hash, balance, version, created_at
            FROM accounts
            WHERE id > ?
            ORDER BY id ASC
            LIMIT ?
            "#,
        )
        .bind(after_id.unwrap_or(0))
        .bind(limit)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(account_from_row).collect())
    }

    async fn update_names(
        &self,
        id: i64,
        first_name: &str,
        last_name: &str,
    ) -> Result<Account, StorageError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts SET first_name = ?, last_name = ? WHERE id = ?
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        self.account_by_id(id).await
    }

    async fn delete_account(&self, id: i64) -> Result<(), StorageError> {
        // The balance guard lives in the statement itself so a racing
        // credit between a caller's check and the delete cannot strand funds.
        let result = sqlx::query(
            r#"
            DELETE FROM accounts WHERE id = ? AND balance = 0
            "#,
        )
        .bind(id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        let exists = sqlx::query("SELECT 1 FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        match exists {
            Some(_) => Err(StorageError::BalanceNotZero),
            None => Err(StorageError::NotFound),
        }
    }

    async fn update_balances(
        &self,
        sender: BalanceUpdate,
        receiver: BalanceUpdate,
    ) -> Result<(), StorageError> {
        let mut tx = self.db.pool().begin().await?;

        let sender_result = sqlx::query(
            r#"
            UPDATE accounts SET balance = ?, version = version + 1
            WHERE id = ? AND version = ?
            "#,
        )
        .bind(sender.new_balance)
        .bind(sender.id)
        .bind(sender.expected_version)
        .execute(&mut *tx)
        .await?;

        let receiver_result = sqlx::query(
            r#"
            UPDATE accounts SET balance = ?, version = version + 1
            WHERE id = ? AND version = ?
            "#,
        )
        .bind(receiver.new_balance)
        .bind(receiver.id)
        .bind(receiver.expected_version)
        .execute(&mut *tx)
        .await?;

        // Either row missing its expected version means a concurrent write
        // landed first; roll back so neither balance changes.
        if sender_result.rows_affected() != 1 || receiver_result.rows_affected() != 1 {
            tx.rollback().await?;
            return Err(StorageError::StaleState);
        }

        tx.commit().await?;
        Ok(())
    }
}
