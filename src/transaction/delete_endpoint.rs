//! Defines the endpoint for deleting a transaction.
use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{Error, app_state::TransactionState, database_id::TransactionId};

/// A route handler for deleting a transaction, responds with a confirmation
/// message or a 404 if the ID does not exist.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    transaction_id: Result<Path<TransactionId>, PathRejection>,
) -> Response {
    let Path(transaction_id) = match transaction_id {
        Ok(transaction_id) => transaction_id,
        Err(rejection) => return Error::from(rejection).into_response(),
    };

    match state.transaction_store.delete(transaction_id).await {
        Ok(()) => {
            tracing::info!("deleted transaction {transaction_id}");
            Json(json!({ "message": "Transaction deleted successfully" })).into_response()
        }
        Err(error @ Error::DeleteMissingTransaction(_)) => {
            tracing::warn!("could not delete transaction {transaction_id}: {error}");
            error.into_response()
        }
        Err(error) => error.into_json_response("Failed to delete transaction"),
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::delete};
    use axum_test::TestServer;

    use crate::{
        AppState,
        endpoints::{self, format_endpoint},
        transaction::{
            TransactionType, delete_transaction_endpoint,
            test_utils::{must_create_test_state, new_transaction},
        },
    };

    fn get_test_server(state: AppState) -> TestServer {
        let app = Router::new()
            .route(endpoints::TRANSACTION, delete(delete_transaction_endpoint))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn deletes_transaction() {
        let state = must_create_test_state();
        let store = state.transaction_store.clone();
        let created = store
            .create(new_transaction(10.0, TransactionType::Gasto))
            .await
            .unwrap();
        let server = get_test_server(state);

        let response = server
            .delete(&format_endpoint(endpoints::TRANSACTION, created.id))
            .await;

        response.assert_status(StatusCode::OK);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_missing_transaction_returns_not_found() {
        let state = must_create_test_state();
        let store = state.transaction_store.clone();
        store
            .create(new_transaction(10.0, TransactionType::Gasto))
            .await
            .unwrap();
        let before = store.list().await.unwrap();
        let server = get_test_server(state);

        let response = server
            .delete(&format_endpoint(endpoints::TRANSACTION, 1337))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(store.list().await.unwrap(), before);
    }
}
