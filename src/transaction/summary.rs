//! Running totals derived from a list of transactions.

use serde::Serialize;

use crate::transaction::Transaction;

/// Totals recomputed from an in-memory list of transactions. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// The sum of all signed amounts.
    pub balance: f64,
    /// The sum of all positive amounts.
    pub income_total: f64,
    /// The sum of the magnitudes of all negative amounts.
    pub expense_total: f64,
}

impl Summary {
    /// Compute the totals for `transactions`.
    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        transactions
            .into_iter()
            .fold(Summary::default(), |mut summary, transaction| {
                summary.balance += transaction.amount;

                if transaction.amount > 0.0 {
                    summary.income_total += transaction.amount;
                } else if transaction.amount < 0.0 {
                    summary.expense_total += transaction.amount.abs();
                }

                summary
            })
    }
}
