//! # Storage Module
//!
//! Handles all data persistence for the bank: accounts and the append-only
//! transfer ledger.
//!
//! This module abstracts away the specific storage implementation details
//! and provides a consistent interface for persisting and retrieving data.
//! The implementation can be swapped out (SQLite, PostgreSQL, etc.) without
//! affecting the domain logic or the HTTP layer.
//!
//! ## Key Responsibilities
//!
//! - **Account Persistence**: Creating, reading, renaming, and deleting
//!   account rows, with the unique account-number index enforced here
//! - **Balance Writes**: The atomic two-row balance update that is the
//!   single place money moves between accounts
//! - **Ledger Appends**: Durable, immutable transfer history
//! - **Concurrency Control**: Optimistic version checks so transfers
//!   touching the same account serialize without global locks
//!
//! ## Design Principles
//!
//! - **Repository Pattern**: Clean separation between domain and data access
//! - **Dependency Inversion**: Domain depends on the traits here, not on
//!   SQLite specifics
//! - **Testability**: Trait objects allow failure-injecting doubles

pub mod error;
pub mod sqlite;
pub mod traits;

pub use error::StorageError;
pub use sqlite::connection::DbConnection;
pub use sqlite::repositories::{AccountRepository, TransactionRepository};
pub use traits::{AccountStore, BalanceUpdate, TransactionStore};
