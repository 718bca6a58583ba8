//! Defines the core data models for transactions and the sign convention
//! shared by the server, the stores and the client.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::database_id::TransactionId;

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
///
/// The type is the sole driver of the sign of [Transaction::amount].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Income, shown as a positive amount.
    Ingreso,
    /// An expense, shown as a negative amount.
    Gasto,
}

impl TransactionType {
    /// The name of the type as stored in the database and sent over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Ingreso => "Ingreso",
            TransactionType::Gasto => "Gasto",
        }
    }

    /// Apply this type's sign to the magnitude of `amount`.
    ///
    /// ```
    /// use ahorrapp::TransactionType;
    ///
    /// assert_eq!(TransactionType::Gasto.signed(22.9), -22.9);
    /// assert_eq!(TransactionType::Gasto.signed(-22.9), -22.9);
    /// assert_eq!(TransactionType::Ingreso.signed(-100.0), 100.0);
    /// ```
    pub fn signed(&self, amount: f64) -> f64 {
        let magnitude = amount.abs();

        match self {
            TransactionType::Ingreso => magnitude,
            // Avoid handing out negative zero.
            TransactionType::Gasto if magnitude == 0.0 => 0.0,
            TransactionType::Gasto => -magnitude,
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The error returned when a string is neither `Ingreso` nor `Gasto`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{0}\" is not a transaction type, expected \"Ingreso\" or \"Gasto\"")]
pub struct UnknownTransactionType(pub String);

impl FromStr for TransactionType {
    type Err = UnknownTransactionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Ingreso" => Ok(TransactionType::Ingreso),
            "Gasto" => Ok(TransactionType::Gasto),
            other => Err(UnknownTransactionType(other.to_owned())),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// `amount` is always signed according to `transaction_type`, see
/// [TransactionType::signed]. Stores persist only the magnitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The signed amount of money spent or earned.
    pub amount: f64,
    /// A free-form category name, e.g. "Salud" or "Casa".
    pub category: String,
    /// When the transaction happened. Usually an ISO date, but not validated.
    pub date: String,
    /// Whether this is a recurring item. Only used for display.
    #[serde(default)]
    pub is_fixed: bool,
    /// Income or expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

/// The fields of a transaction that a client provides when creating or
/// replacing a transaction.
///
/// `amount` may carry any sign, stores only keep its magnitude and the sign
/// is derived from `transaction_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount, either as a JSON number or a numeric string.
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: f64,
    /// A free-form category name.
    pub category: String,
    /// When the transaction happened.
    pub date: String,
    /// Whether this is a recurring item.
    #[serde(default)]
    pub is_fixed: bool,
    /// Income or expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

impl NewTransaction {
    /// The non-negative amount to persist.
    pub fn magnitude(&self) -> f64 {
        self.amount.abs()
    }

    /// Combine these fields with an `id` into a [Transaction] with a signed
    /// amount.
    pub fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            amount: self.transaction_type.signed(self.amount),
            description: self.description,
            category: self.category,
            date: self.date,
            is_fixed: self.is_fixed,
            transaction_type: self.transaction_type,
        }
    }
}

impl From<Transaction> for NewTransaction {
    fn from(transaction: Transaction) -> Self {
        Self {
            description: transaction.description,
            amount: transaction.amount,
            category: transaction.category,
            date: transaction.date,
            is_fixed: transaction.is_fixed,
            transaction_type: transaction.transaction_type,
        }
    }
}

/// Deserialize an amount that may be sent as a number or as a numeric string,
/// e.g. `22.9` or `"22.90"`.
pub(crate) fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    let amount = match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(amount) => amount,
        NumberOrString::String(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("\"{text}\" is not a number")))?,
    };

    if amount.is_finite() {
        Ok(amount)
    } else {
        Err(serde::de::Error::custom("amount must be a finite number"))
    }
}

// ============================================================================
// TESTS
// ============================================================================
