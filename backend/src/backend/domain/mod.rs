//! # Domain Module
//!
//! Contains all business logic for the bank.
//!
//! This module encapsulates the rules that govern how balances change, how
//! transfers are authorized and recorded, and how account lifecycles work.
//! It operates independently of the HTTP layer and of any specific storage
//! backend.
//!
//! ## Module Organization
//!
//! - **models**: The account entity and the immutable ledger entry
//! - **secrets**: One-way credential hashing and verification capability
//! - **account_service**: Account creation, login, renaming, deletion
//! - **transfer_service**: The transfer engine and its conflict retry loop
//! - **auth_service**: Token issuance and the self-access-only gate
//!
//! ## Business Rules
//!
//! - Money is conserved: a transfer debits and credits atomically or not
//!   at all
//! - Balances never go negative; overdrafts fail before anything is
//!   written
//! - Ledger entries are immutable and survive account deletion
//! - An account can only be deleted once its balance is zero
//! - Callers act on their own account only, enforced before every
//!   account-scoped operation

pub mod account_service;
pub mod auth_service;
pub mod models;
pub mod secrets;
pub mod transfer_service;

pub use account_service::{AccountError, AccountService};
pub use auth_service::{AuthError, AuthGate, Authenticator};
pub use secrets::{BcryptVerifier, SecretVerifier};
pub use transfer_service::{TransferError, TransferService};
