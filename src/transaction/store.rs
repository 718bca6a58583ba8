//! Defines the transaction store trait.

use std::fmt::Display;

use async_trait::async_trait;

use crate::{
    Error,
    database_id::TransactionId,
    transaction::{NewTransaction, Transaction},
};

/// The database engine behind a [TransactionStore].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// A single SQLite database file.
    SQLite,
    /// A PostgreSQL server.
    PostgreSQL,
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::SQLite => write!(f, "SQLite"),
            StorageBackend::PostgreSQL => write!(f, "PostgreSQL"),
        }
    }
}

/// Handles the creation, retrieval, replacement and removal of transactions.
///
/// Implementers must persist only the magnitude of an amount and return
/// transactions whose amount is signed by their type.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// The database engine this store writes to.
    fn backend(&self) -> StorageBackend;

    /// Retrieve every transaction, newest (highest ID) first.
    async fn list(&self) -> Result<Vec<Transaction>, Error>;

    /// Create a new transaction and return it with its assigned ID.
    async fn create(&self, transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Replace all fields of the transaction with `id`.
    ///
    /// # Errors
    /// Returns [Error::UpdateMissingTransaction] if no transaction has the ID `id`.
    async fn update(
        &self,
        id: TransactionId,
        transaction: NewTransaction,
    ) -> Result<Transaction, Error>;

    /// Remove the transaction with `id`.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingTransaction] if no transaction has the ID `id`.
    async fn delete(&self, id: TransactionId) -> Result<(), Error>;
}
