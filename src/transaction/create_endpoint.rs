//! Defines the endpoint for creating a new transaction.
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{Error, app_state::TransactionState, transaction::NewTransaction};

/// A route handler for creating a new transaction, responds with the created
/// transaction and a 201 status code.
///
/// The amount is stored as a magnitude and the sign of the returned amount is
/// derived from the transaction type.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    body: Result<Json<NewTransaction>, JsonRejection>,
) -> Response {
    let Json(new_transaction) = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::debug!("rejected create transaction body: {rejection}");
            return Error::from(rejection).into_response();
        }
    };

    match state.transaction_store.create(new_transaction).await {
        Ok(transaction) => {
            tracing::info!("created transaction {}", transaction.id);
            (StatusCode::CREATED, Json(transaction)).into_response()
        }
        Err(error) => error.into_json_response("Failed to add transaction"),
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{
        Transaction, endpoints,
        transaction::{
            TransactionType, create_transaction_endpoint, list_transactions_endpoint,
            test_utils::must_create_test_state,
        },
    };

    fn get_test_server() -> TestServer {
        let app = Router::new()
            .route(
                endpoints::TRANSACTIONS_API,
                post(create_transaction_endpoint).get(list_transactions_endpoint),
            )
            .with_state(must_create_test_state());

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn create_expense_returns_negative_amount() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "description": "bembos",
                "amount": 22.9,
                "category": "comida",
                "date": "2025-02-04",
                "isFixed": false,
                "type": "Gasto"
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let transaction = response.json::<Transaction>();
        assert_eq!(transaction.id, 1);
        assert_eq!(transaction.amount, -22.9);
        assert_eq!(transaction.transaction_type, TransactionType::Gasto);
    }

    #[tokio::test]
    async fn create_income_with_negative_amount_returns_positive_amount() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "description": "Sueldo",
                "amount": -1500,
                "category": "Trabajo",
                "date": "2025-02-01",
                "isFixed": true,
                "type": "Ingreso"
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let transaction = response.json::<Transaction>();
        assert_eq!(transaction.amount, 1500.0);
        assert!(transaction.is_fixed);
    }

    #[tokio::test]
    async fn created_transaction_is_listed_first() {
        let server = get_test_server();
        for description in ["first", "second"] {
            server
                .post(endpoints::TRANSACTIONS_API)
                .json(&json!({
                    "description": description,
                    "amount": 1,
                    "category": "Casa",
                    "date": "2025-02-04",
                    "type": "Gasto"
                }))
                .await
                .assert_status(StatusCode::CREATED);
        }
        let created = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "description": "third",
                "amount": 3,
                "category": "Casa",
                "date": "2025-02-04",
                "type": "Gasto"
            }))
            .await
            .json::<Transaction>();

        let transactions = server
            .get(endpoints::TRANSACTIONS_API)
            .await
            .json::<Vec<Transaction>>();

        assert_eq!(transactions.first(), Some(&created));
        assert_eq!(transactions.len(), 3);
    }

    #[tokio::test]
    async fn unknown_type_is_rejected() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "description": "Regalo",
                "amount": 5,
                "category": "Otros",
                "date": "2025-02-04",
                "type": "Regalo"
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let transactions = server
            .get(endpoints::TRANSACTIONS_API)
            .await
            .json::<Vec<Transaction>>();
        assert!(transactions.is_empty());
    }

    #[tokio::test]
    async fn missing_field_is_rejected() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({ "description": "sin monto", "type": "Gasto" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
