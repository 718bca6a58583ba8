//! Demo transactions shown when neither the server nor a cache has any data.

use crate::{Transaction, TransactionType};

/// Two example expenses used to seed an empty local list.
pub fn sample_transactions() -> Vec<Transaction> {
    vec![
        Transaction {
            id: 1,
            description: "Farmacia".to_owned(),
            amount: -10.0,
            category: "Salud".to_owned(),
            date: "2023-06-15".to_owned(),
            is_fixed: false,
            transaction_type: TransactionType::Gasto,
        },
        Transaction {
            id: 2,
            description: "Internet".to_owned(),
            amount: -20.0,
            category: "Casa".to_owned(),
            date: "2023-06-10".to_owned(),
            is_fixed: false,
            transaction_type: TransactionType::Gasto,
        },
    ]
}
