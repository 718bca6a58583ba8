//! Liveness endpoints.
use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::app_state::TransactionState;

/// Report that the server is up and which database it uses.
pub async fn get_health(State(state): State<TransactionState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running properly",
        "database": state.transaction_store.backend().to_string(),
    }))
}

/// Report that the server is up, kept for clients that poll `/api/status`.
pub async fn get_status(State(state): State<TransactionState>) -> Json<Value> {
    Json(json!({
        "status": "Server is running",
        "database": state.transaction_store.backend().to_string(),
    }))
}
