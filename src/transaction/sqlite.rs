//! Implements a SQLite backed transaction store.
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};

use crate::{
    Error,
    database_id::TransactionId,
    transaction::{
        NewTransaction, Transaction, TransactionType,
        store::{StorageBackend, TransactionStore},
    },
};

/// Stores transactions in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// This function will create the transaction table if it does not exist.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the table could not be created.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        create_transaction_table(&connection)?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

#[async_trait]
impl TransactionStore for SQLiteTransactionStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::SQLite
    }

    async fn list(&self) -> Result<Vec<Transaction>, Error> {
        let connection = self.lock()?;

        connection
            .prepare(
                "SELECT id, description, amount, category, date, is_fixed, type
                 FROM transactions ORDER BY id DESC",
            )?
            .query_map([], map_transaction_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect()
    }

    async fn create(&self, transaction: NewTransaction) -> Result<Transaction, Error> {
        let connection = self.lock()?;

        let transaction = connection
            .prepare(
                "INSERT INTO transactions (description, amount, category, date, is_fixed, type)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING id, description, amount, category, date, is_fixed, type",
            )?
            .query_row(
                (
                    &transaction.description,
                    transaction.magnitude(),
                    &transaction.category,
                    &transaction.date,
                    transaction.is_fixed,
                    transaction.transaction_type,
                ),
                map_transaction_row,
            )?;

        Ok(transaction)
    }

    async fn update(
        &self,
        id: TransactionId,
        transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        let connection = self.lock()?;

        let rows_affected = connection.execute(
            "UPDATE transactions
             SET description = ?1, amount = ?2, category = ?3, date = ?4, is_fixed = ?5, type = ?6
             WHERE id = ?7",
            (
                &transaction.description,
                transaction.magnitude(),
                &transaction.category,
                &transaction.date,
                transaction.is_fixed,
                transaction.transaction_type,
                id,
            ),
        )?;

        if rows_affected == 0 {
            return Err(Error::UpdateMissingTransaction(id));
        }

        Ok(transaction.into_transaction(id))
    }

    async fn delete(&self, id: TransactionId) -> Result<(), Error> {
        let connection = self.lock()?;

        let rows_affected =
            connection.execute("DELETE FROM transactions WHERE id = :id", &[(":id", &id)])?;

        if rows_affected == 0 {
            return Err(Error::DeleteMissingTransaction(id));
        }

        Ok(())
    }
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                description TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                date TEXT NOT NULL,
                is_fixed BOOLEAN DEFAULT 0,
                type TEXT NOT NULL CHECK (type IN ('Ingreso', 'Gasto'))
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Transaction], applying the sign of its type to
/// the stored magnitude.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let description = row.get(1)?;
    let magnitude: f64 = row.get(2)?;
    let category = row.get(3)?;
    let date = row.get(4)?;
    let is_fixed: Option<bool> = row.get(5)?;
    let transaction_type: TransactionType = row.get(6)?;

    Ok(Transaction {
        id,
        description,
        amount: transaction_type.signed(magnitude),
        category,
        date,
        is_fixed: is_fixed.unwrap_or(false),
        transaction_type,
    })
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}
