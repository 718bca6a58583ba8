//! Implements a PostgreSQL backed transaction store.
use std::time::Duration;

use async_trait::async_trait;
use sqlx::{
    Row,
    postgres::{PgPool, PgPoolOptions, PgRow},
};

use crate::{
    Error,
    database_id::TransactionId,
    transaction::{
        NewTransaction, Transaction, TransactionType,
        store::{StorageBackend, TransactionStore},
    },
};

/// Stores transactions in a PostgreSQL database.
#[derive(Debug, Clone)]
pub struct PostgresTransactionStore {
    pool: PgPool,
}

impl PostgresTransactionStore {
    /// Connect to the database at `database_url` and create the transaction
    /// table if it does not exist.
    ///
    /// # Errors
    /// Returns an [Error::PostgresError] if the connection could not be made
    /// or the table could not be created.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, Error> {
        tracing::info!(max_connections, "Connecting to PostgreSQL");

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(database_url)
            .await?;

        create_transaction_table(&pool).await?;

        tracing::info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }
}

#[async_trait]
impl TransactionStore for PostgresTransactionStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::PostgreSQL
    }

    async fn list(&self) -> Result<Vec<Transaction>, Error> {
        sqlx::query(
            "SELECT id, description, amount, category, date, is_fixed, type
             FROM transactions ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(map_transaction_row)
        .collect()
    }

    async fn create(&self, transaction: NewTransaction) -> Result<Transaction, Error> {
        let row = sqlx::query(
            "INSERT INTO transactions (description, amount, category, date, is_fixed, type)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id, description, amount, category, date, is_fixed, type",
        )
        .bind(&transaction.description)
        .bind(transaction.magnitude())
        .bind(&transaction.category)
        .bind(&transaction.date)
        .bind(transaction.is_fixed)
        .bind(transaction.transaction_type.as_str())
        .fetch_one(&self.pool)
        .await?;

        map_transaction_row(&row)
    }

    async fn update(
        &self,
        id: TransactionId,
        transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        let result = sqlx::query(
            "UPDATE transactions
             SET description = $1, amount = $2, category = $3, date = $4, is_fixed = $5, type = $6
             WHERE id = $7",
        )
        .bind(&transaction.description)
        .bind(transaction.magnitude())
        .bind(&transaction.category)
        .bind(&transaction.date)
        .bind(transaction.is_fixed)
        .bind(transaction.transaction_type.as_str())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::UpdateMissingTransaction(id));
        }

        Ok(transaction.into_transaction(id))
    }

    async fn delete(&self, id: TransactionId) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::DeleteMissingTransaction(id));
        }

        Ok(())
    }
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub async fn create_transaction_table(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS transactions (
                id BIGSERIAL PRIMARY KEY,
                description TEXT NOT NULL,
                amount DOUBLE PRECISION NOT NULL,
                category TEXT NOT NULL,
                date TEXT NOT NULL,
                is_fixed BOOLEAN NOT NULL DEFAULT FALSE,
                type TEXT NOT NULL CHECK (type IN ('Ingreso', 'Gasto'))
                )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

fn map_transaction_row(row: &PgRow) -> Result<Transaction, Error> {
    let transaction_type: String = row.try_get("type")?;
    let transaction_type: TransactionType = transaction_type
        .parse()
        .map_err(|error: crate::transaction::UnknownTransactionType| {
            Error::PostgresError(error.to_string())
        })?;
    let magnitude: f64 = row.try_get("amount")?;

    Ok(Transaction {
        id: row.try_get("id")?,
        description: row.try_get("description")?,
        amount: transaction_type.signed(magnitude),
        category: row.try_get("category")?,
        date: row.try_get("date")?,
        is_fixed: row.try_get("is_fixed")?,
        transaction_type,
    })
}
