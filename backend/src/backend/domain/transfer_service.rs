//! The transfer engine: executes one peer-to-peer transfer as an
//! all-or-nothing operation.
//!
//! The engine never caches balances across requests. Each attempt reads
//! both accounts fresh, validates, and hands the store a single atomic
//! two-row update conditioned on the versions it read. A concurrent write
//! to either account surfaces as `StaleState` and the whole attempt is
//! repeated from the loads, up to a bounded retry budget.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::backend::domain::models::transaction::{Transaction, TransactionDraft};
use crate::backend::domain::secrets::SecretVerifier;
use crate::backend::storage::{AccountStore, BalanceUpdate, StorageError, TransactionStore};
use shared::TransferRequest;

/// Base delay between conflict retries; grows linearly with the attempt.
const RETRY_BACKOFF: Duration = Duration::from_millis(25);

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("transfer amount must be positive")]
    InvalidAmount,
    #[error("cannot transfer to the sending account")]
    SelfTransfer,
    #[error("sender account not found")]
    SenderNotFound,
    #[error("receiver account not found")]
    ReceiverNotFound,
    /// Deliberately silent about which factor failed.
    #[error("invalid credentials")]
    InvalidCredential,
    #[error("insufficient funds")]
    InsufficientFunds,
    /// The retry budget ran out under contention. Safe to retry.
    #[error("transfer conflicted with concurrent activity, try again")]
    Conflict,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The committed result of a transfer.
#[derive(Debug)]
pub struct TransferReceipt {
    pub sender: i64,
    pub receiver: i64,
    pub amount: i64,
    /// Sender balance after the commit
    pub sender_balance: i64,
    pub time: DateTime<Utc>,
    /// The ledger entry, absent only if the best-effort history append
    /// failed after the balances committed.
    pub transaction: Option<Transaction>,
}

#[derive(Clone)]
pub struct TransferService {
    accounts: Arc<dyn AccountStore>,
    transactions: Arc<dyn TransactionStore>,
    verifier: Arc<dyn SecretVerifier>,
    retry_limit: u32,
}

impl TransferService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        transactions: Arc<dyn TransactionStore>,
        verifier: Arc<dyn SecretVerifier>,
        retry_limit: u32,
    ) -> Self {
        Self { accounts, transactions, verifier, retry_limit }
    }

    /// Move `request.amount` from the authenticated sender to the receiver.
    ///
    /// Any failure before the atomic commit leaves both balances untouched.
    /// After the commit the transfer has happened; a failing history append
    /// is reported to operators, not to the caller.
    pub async fn transfer(
        &self,
        sender_number: i64,
        request: &TransferRequest,
    ) -> Result<TransferReceipt, TransferError> {
        if request.amount <= 0 {
            return Err(TransferError::InvalidAmount);
        }
        if request.receiver == sender_number {
            return Err(TransferError::SelfTransfer);
        }

        let mut attempt = 0;
        loop {
            attempt += 1;

            let sender = match self.accounts.account_by_number(sender_number).await {
                Ok(account) => account,
                Err(StorageError::NotFound) => return Err(TransferError::SenderNotFound),
                Err(e) => return Err(e.into()),
            };

            if !sender.valid_pin(self.verifier.as_ref(), &request.pin).await {
                return Err(TransferError::InvalidCredential);
            }

            let receiver = match self.accounts.account_by_number(request.receiver).await {
                Ok(account) => account,
                Err(StorageError::NotFound) => return Err(TransferError::ReceiverNotFound),
                Err(e) => return Err(e.into()),
            };

            if sender.balance < request.amount {
                return Err(TransferError::InsufficientFunds);
            }

            let sender_update = BalanceUpdate {
                id: sender.id,
                expected_version: sender.version,
                new_balance: sender.balance - request.amount,
            };
            let receiver_update = BalanceUpdate {
                id: receiver.id,
                expected_version: receiver.version,
                new_balance: receiver.balance + request.amount,
            };

            match self.accounts.update_balances(sender_update, receiver_update).await {
                Ok(()) => {
                    let time = Utc::now();
                    info!(
                        sender = sender_number,
                        receiver = request.receiver,
                        amount = request.amount,
                        "transfer committed"
                    );

                    let draft =
                        TransactionDraft::new(sender_number, request.receiver, request.amount, time);
                    let transaction = match self.transactions.append_transaction(&draft).await {
                        Ok(transaction) => Some(transaction),
                        Err(e) => {
                            // The balances are already committed and stay
                            // committed; the missing history row is an
                            // operator reconciliation concern.
                            warn!(
                                sender = sender_number,
                                receiver = request.receiver,
                                amount = request.amount,
                                error = %e,
                                "transfer committed but ledger entry was not recorded"
                            );
                            None
                        }
                    };

                    return Ok(TransferReceipt {
                        sender: sender_number,
                        receiver: request.receiver,
                        amount: request.amount,
                        sender_balance: sender_update.new_balance,
                        time,
                        transaction,
                    });
                }
                Err(StorageError::StaleState) if attempt <= self.retry_limit => {
                    debug!(attempt, "concurrent balance change, retrying transfer");
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                }
                Err(StorageError::StaleState) => return Err(TransferError::Conflict),
                Err(e) => return Err(e.into()),
            }
        }
    }
}
