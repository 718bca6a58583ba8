//! Implements a struct that holds the state of the REST server.

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{transaction::TransactionStore, whatsapp::UnknownTypePolicy};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The store for all [transactions](crate::Transaction).
    pub transaction_store: Arc<dyn TransactionStore>,

    /// How the WhatsApp message parser treats type tokens other than
    /// `Ingreso` and `Gasto`.
    pub unknown_type_policy: UnknownTypePolicy,
}

impl AppState {
    /// Create a new [AppState].
    pub fn new(
        transaction_store: Arc<dyn TransactionStore>,
        unknown_type_policy: UnknownTypePolicy,
    ) -> Self {
        Self {
            transaction_store,
            unknown_type_policy,
        }
    }
}

/// The state needed to list, create, update or delete transactions.
#[derive(Clone)]
pub struct TransactionState {
    /// The store for all [transactions](crate::Transaction).
    pub transaction_store: Arc<dyn TransactionStore>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
        }
    }
}

/// The state needed to turn WhatsApp messages into transactions.
#[derive(Clone)]
pub struct WhatsAppState {
    /// The store that parsed transactions are written to.
    pub transaction_store: Arc<dyn TransactionStore>,
    /// How to treat type tokens other than `Ingreso` and `Gasto`.
    pub unknown_type_policy: UnknownTypePolicy,
}

impl FromRef<AppState> for WhatsAppState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
            unknown_type_policy: state.unknown_type_policy,
        }
    }
}
