//! # SQLite Storage Module
//!
//! SQLite-backed implementation of the ledger store.
//!
//! ## Components
//!
//! - **connection.rs** - database connection and schema management
//! - **repositories/** - `AccountStore` / `TransactionStore` implementations

pub mod connection;
pub mod repositories;

pub use connection::DbConnection;
pub use repositories::{AccountRepository, TransactionRepository};
