//! Defines the endpoint for listing every transaction.
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};

use crate::app_state::TransactionState;

/// A route handler that responds with every transaction as JSON, newest first.
pub async fn list_transactions_endpoint(State(state): State<TransactionState>) -> Response {
    match state.transaction_store.list().await {
        Ok(transactions) => Json(transactions).into_response(),
        Err(error) => error.into_json_response("Failed to fetch transactions"),
    }
}
