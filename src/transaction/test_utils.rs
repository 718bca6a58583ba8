//! Helpers shared by the transaction tests.
use std::sync::Arc;

use rusqlite::Connection;

use crate::{
    AppState,
    transaction::{NewTransaction, SQLiteTransactionStore, TransactionType},
    whatsapp::UnknownTypePolicy,
};

/// A new transaction with placeholder text fields.
pub fn new_transaction(amount: f64, transaction_type: TransactionType) -> NewTransaction {
    NewTransaction {
        description: "Test".to_owned(),
        amount,
        category: "Pruebas".to_owned(),
        date: "2025-02-04".to_owned(),
        is_fixed: false,
        transaction_type,
    }
}

/// App state backed by an empty in-memory SQLite database.
#[track_caller]
pub fn must_create_test_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("could not create in-memory SQLite database");
    let store = SQLiteTransactionStore::new(connection).expect("could not create test store");

    AppState::new(Arc::new(store), UnknownTypePolicy::DefaultToIncome)
}
