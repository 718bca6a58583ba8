//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions on the server:
//! - The `Transaction` model and its sign convention
//! - The `TransactionStore` trait with SQLite and PostgreSQL implementations
//! - Route handlers for the transaction REST API

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;
#[cfg(feature = "postgres")]
mod postgres;
mod sqlite;
mod store;
mod summary;

#[cfg(test)]
pub(crate) mod test_utils;

pub(crate) use core::deserialize_amount;
pub use core::{NewTransaction, Transaction, TransactionType, UnknownTransactionType};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;
#[cfg(feature = "postgres")]
pub use postgres::PostgresTransactionStore;
pub use sqlite::SQLiteTransactionStore;
pub use store::{StorageBackend, TransactionStore};
pub use summary::Summary;
