//! Defines the endpoint for replacing an existing transaction.
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    response::{IntoResponse, Response},
};

use crate::{
    Error, app_state::TransactionState, database_id::TransactionId, transaction::NewTransaction,
};

/// A route handler that replaces every field of a transaction, responds with
/// the updated transaction or a 404 if the ID does not exist.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionState>,
    transaction_id: Result<Path<TransactionId>, PathRejection>,
    body: Result<Json<NewTransaction>, JsonRejection>,
) -> Response {
    let Path(transaction_id) = match transaction_id {
        Ok(transaction_id) => transaction_id,
        Err(rejection) => return Error::from(rejection).into_response(),
    };

    let Json(new_transaction) = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::debug!("rejected edit transaction body: {rejection}");
            return Error::from(rejection).into_response();
        }
    };

    match state
        .transaction_store
        .update(transaction_id, new_transaction)
        .await
    {
        Ok(transaction) => Json(transaction).into_response(),
        Err(error @ Error::UpdateMissingTransaction(_)) => {
            tracing::warn!("could not update transaction {transaction_id}: {error}");
            error.into_response()
        }
        Err(error) => error.into_json_response("Failed to update transaction"),
    }
}
