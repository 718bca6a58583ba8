//! Defines the webhook that turns a free-text WhatsApp message into a transaction.
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{Error, app_state::WhatsAppState, whatsapp::parse_message};

/// The body posted to the webhook.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct WebhookPayload {
    /// The message text, e.g. "Gasto, comida, bembos, 22.90, 4-2-25".
    #[serde(default)]
    pub message: Option<String>,
}

/// A route handler that parses the posted message and stores the resulting
/// transaction, responds with 201 and the created transaction or 400 if the
/// message is malformed.
pub async fn whatsapp_webhook_endpoint(
    State(state): State<WhatsAppState>,
    body: Result<Json<WebhookPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match body {
        Ok(body) => body,
        Err(rejection) => return Error::from(rejection).into_response(),
    };

    let message = payload.message.unwrap_or_default();
    tracing::info!("Received WhatsApp message: {message:?}");

    let new_transaction = match parse_message(&message, state.unknown_type_policy) {
        Ok(new_transaction) => new_transaction,
        Err(error) => {
            tracing::info!("Could not parse WhatsApp message {message:?}: {error}");
            return Error::from(error).into_response();
        }
    };

    tracing::debug!("Parsed WhatsApp transaction: {new_transaction:?}");

    match state.transaction_store.create(new_transaction).await {
        Ok(transaction) => {
            tracing::info!("WhatsApp transaction {} added successfully", transaction.id);
            (
                StatusCode::CREATED,
                Json(json!({
                    "message": "Transaction added successfully",
                    "transaction": transaction,
                })),
            )
                .into_response()
        }
        Err(error) => error.into_json_response("Failed to add transaction"),
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use crate::{
        AppState, Transaction, TransactionType, endpoints,
        transaction::test_utils::must_create_test_state,
        whatsapp::{UnknownTypePolicy, whatsapp_webhook_endpoint},
    };

    fn get_test_server(state: AppState) -> TestServer {
        let app = Router::new()
            .route(endpoints::WHATSAPP_WEBHOOK, post(whatsapp_webhook_endpoint))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn valid_message_creates_transaction() {
        let state = must_create_test_state();
        let store = state.transaction_store.clone();
        let server = get_test_server(state);

        let response = server
            .post(endpoints::WHATSAPP_WEBHOOK)
            .json(&json!({ "message": "Gasto, comida, bembos, 22.90, 4-2-25" }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body = response.json::<Value>();
        assert_eq!(body["message"], "Transaction added successfully");
        let transaction: Transaction = serde_json::from_value(body["transaction"].clone()).unwrap();
        assert_eq!(
            transaction,
            Transaction {
                id: 1,
                description: "bembos".to_owned(),
                amount: -22.9,
                category: "comida".to_owned(),
                date: "4-2-25".to_owned(),
                is_fixed: false,
                transaction_type: TransactionType::Gasto,
            }
        );
        assert_eq!(store.list().await.unwrap(), vec![transaction]);
    }

    #[tokio::test]
    async fn short_message_is_rejected() {
        let state = must_create_test_state();
        let store = state.transaction_store.clone();
        let server = get_test_server(state);

        let response = server
            .post(endpoints::WHATSAPP_WEBHOOK)
            .json(&json!({ "message": "Gasto, comida, bembos" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["error"], "Invalid message format");
        assert_eq!(body["expected"], "Tipo, Categoría, Descripción, Monto, Fecha");
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_numeric_amount_is_rejected() {
        let server = get_test_server(must_create_test_state());

        let response = server
            .post(endpoints::WHATSAPP_WEBHOOK)
            .json(&json!({ "message": "Gasto, comida, bembos, abc, 4-2-25" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"], "Invalid transaction data");
    }

    #[tokio::test]
    async fn missing_message_is_rejected() {
        let server = get_test_server(must_create_test_state());

        let response = server.post(endpoints::WHATSAPP_WEBHOOK).json(&json!({})).await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn strict_policy_rejects_unknown_type() {
        let mut state = must_create_test_state();
        state.unknown_type_policy = UnknownTypePolicy::Strict;
        let server = get_test_server(state);

        let response = server
            .post(endpoints::WHATSAPP_WEBHOOK)
            .json(&json!({ "message": "Regalo, familia, abuela, 50, 2025-02-04" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
