//! Account lifecycle domain logic: creation, login, lookup, renaming,
//! deletion, and transfer history.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::backend::domain::auth_service::Authenticator;
use crate::backend::domain::models::account::{
    Account, AccountDraft, AccountDraftError, CredentialPolicy,
};
use crate::backend::domain::models::transaction::Transaction;
use crate::backend::domain::secrets::SecretVerifier;
use crate::backend::storage::{AccountStore, StorageError, TransactionStore};
use shared::{CreateAccountRequest, LoginRequest, UpdateAccountRequest};

/// How many fresh numbers to try before giving up on account creation.
const NUMBER_ALLOCATION_ATTEMPTS: u32 = 5;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Draft(#[from] AccountDraftError),
    #[error("could not allocate a unique account number")]
    NumberAllocationFailed,
    #[error("account not found")]
    NotFound,
    /// Deliberately silent about which factor failed.
    #[error("invalid credentials")]
    InvalidCredential,
    #[error("account balance must be zero before deletion")]
    BalanceNotZero,
    #[error("failed to issue token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for AccountError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => AccountError::NotFound,
            StorageError::BalanceNotZero => AccountError::BalanceNotZero,
            other => AccountError::Storage(other),
        }
    }
}

/// A successful login: the account plus a token to present on later calls.
#[derive(Debug)]
pub struct LoginOutcome {
    pub account: Account,
    pub token: String,
}

/// One page of the account listing.
pub struct AccountPage {
    pub accounts: Vec<Account>,
    pub has_more: bool,
    pub next_cursor: Option<i64>,
}

#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
    transactions: Arc<dyn TransactionStore>,
    verifier: Arc<dyn SecretVerifier>,
    authenticator: Arc<Authenticator>,
    policy: CredentialPolicy,
}

impl AccountService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        transactions: Arc<dyn TransactionStore>,
        verifier: Arc<dyn SecretVerifier>,
        authenticator: Arc<Authenticator>,
        policy: CredentialPolicy,
    ) -> Self {
        Self { accounts, transactions, verifier, authenticator, policy }
    }

    /// Create an account with a zero balance and a fresh random number.
    /// Number collisions redraw and retry; the hashed secrets are reused
    /// across attempts so bcrypt runs only once.
    pub async fn create_account(
        &self,
        request: CreateAccountRequest,
    ) -> Result<Account, AccountError> {
        let mut draft = AccountDraft::new(
            &request.first_name,
            &request.last_name,
            &request.password,
            &request.pin,
            &self.policy,
            self.verifier.as_ref(),
        )
        .await?;

        for attempt in 1..=NUMBER_ALLOCATION_ATTEMPTS {
            match self.accounts.create_account(&draft).await {
                Ok(account) => {
                    info!(account = account.number, "account created");
                    return Ok(account);
                }
                Err(StorageError::DuplicateNumber) => {
                    warn!(
                        attempt,
                        "account number collision, drawing a fresh number"
                    );
                    draft.redraw_number();
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AccountError::NumberAllocationFailed)
    }

    /// Authenticate by account number and password, and issue a token.
    /// An unknown number and a wrong password are indistinguishable to the
    /// caller.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginOutcome, AccountError> {
        let account = match self.accounts.account_by_number(request.number).await {
            Ok(account) => account,
            Err(StorageError::NotFound) => return Err(AccountError::InvalidCredential),
            Err(e) => return Err(e.into()),
        };

        if !account.valid_password(self.verifier.as_ref(), &request.password).await {
            return Err(AccountError::InvalidCredential);
        }

        let token = self.authenticator.issue(account.number)?;
        info!(account = account.number, "login succeeded");

        Ok(LoginOutcome { account, token })
    }

    pub async fn account(&self, id: i64) -> Result<Account, AccountError> {
        Ok(self.accounts.account_by_id(id).await?)
    }

    /// One ascending-by-id page. Queries one extra row to learn whether a
    /// further page exists.
    pub async fn list_accounts(
        &self,
        limit: u32,
        after: Option<i64>,
    ) -> Result<AccountPage, AccountError> {
        let limit = limit.clamp(1, 100);
        let mut accounts = self.accounts.list_accounts(limit + 1, after).await?;

        let has_more = accounts.len() > limit as usize;
        if has_more {
            accounts.pop();
        }
        let next_cursor = if has_more { accounts.last().map(|a| a.id) } else { None };

        Ok(AccountPage { accounts, has_more, next_cursor })
    }

    /// Owner profile update: display names only, nothing else is mutable.
    pub async fn update_names(
        &self,
        id: i64,
        request: UpdateAccountRequest,
    ) -> Result<Account, AccountError> {
        let first_name = request.first_name.trim();
        let last_name = request.last_name.trim();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(AccountDraftError::InvalidInput(
                "first and last name must not be empty".to_string(),
            )
            .into());
        }

        Ok(self.accounts.update_names(id, first_name, last_name).await?)
    }

    /// Delete an account once it has been emptied. The store re-checks the
    /// balance guard atomically, so a racing credit cannot strand funds.
    pub async fn delete_account(&self, id: i64) -> Result<(), AccountError> {
        let account = self.accounts.account_by_id(id).await?;
        if account.balance != 0 {
            return Err(AccountError::BalanceNotZero);
        }

        self.accounts.delete_account(id).await?;
        info!(account = account.number, "account deleted");
        Ok(())
    }

    /// Full transfer history for an account number, time ascending.
    pub async fn transactions_involving(
        &self,
        number: i64,
    ) -> Result<Vec<Transaction>, AccountError> {
        Ok(self.transactions.transactions_involving(number).await?)
    }
}
