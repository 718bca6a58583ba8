//! Application router configuration.

use axum::{
    Router,
    http::{Method, header},
    middleware,
    routing::{get, post, put},
};
use tower_http::cors::{Any, CorsLayer};

use crate::{
    AppState, endpoints,
    health::{get_health, get_status},
    logging::logging_middleware,
    not_found::get_404_not_found,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        list_transactions_endpoint,
    },
    whatsapp::{whatsapp_test_endpoint, whatsapp_webhook_endpoint},
};

/// Return a router with all the app's routes.
///
/// Every route is public and any origin may call the API.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(endpoints::STATUS, get(get_status))
        .route(
            endpoints::TRANSACTIONS_API,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(endpoints::WHATSAPP_WEBHOOK, post(whatsapp_webhook_endpoint))
        .route(endpoints::WHATSAPP_TEST, post(whatsapp_test_endpoint))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .layer(cors_layer())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Bytes,
        http::{HeaderValue, StatusCode, header},
    };
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use crate::{
        Transaction, build_router,
        endpoints::{self, format_endpoint},
        transaction::test_utils::must_create_test_state,
    };

    fn get_test_server() -> TestServer {
        TestServer::try_new(build_router(must_create_test_state()))
            .expect("Could not create test server.")
    }

    #[tokio::test]
    async fn unknown_route_returns_json_not_found() {
        let server = get_test_server();

        let response = server.get("/api/nope").await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>(), json!({ "error": "Not found" }));
    }

    #[tokio::test]
    async fn any_origin_is_allowed() {
        let server = get_test_server();

        let response = server
            .get(endpoints::HEALTH)
            .add_header(header::ORIGIN, HeaderValue::from_static("http://example.com"))
            .await;

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("*"))
        );
    }

    #[tokio::test]
    async fn full_crud_round_trip() {
        let server = get_test_server();

        let created = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "description": "Farmacia",
                "amount": 10,
                "category": "Salud",
                "date": "2023-06-15",
                "type": "Gasto"
            }))
            .await
            .json::<Transaction>();
        let transaction_path = format_endpoint(endpoints::TRANSACTION, created.id);

        server
            .put(&transaction_path)
            .json(&json!({
                "description": "Farmacia",
                "amount": 12.5,
                "category": "Salud",
                "date": "2023-06-15",
                "isFixed": true,
                "type": "Gasto"
            }))
            .await
            .assert_status_ok();
        let listed = server
            .get(endpoints::TRANSACTIONS_API)
            .await
            .json::<Vec<Transaction>>();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].amount, -12.5);
        assert!(listed[0].is_fixed);

        server.delete(&transaction_path).await.assert_status_ok();
        server
            .delete(&transaction_path)
            .await
            .assert_status(StatusCode::NOT_FOUND);
        assert!(
            server
                .get(endpoints::TRANSACTIONS_API)
                .await
                .json::<Vec<Transaction>>()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn webhook_rejects_invalid_utf8_and_stores_nothing() {
        let state = must_create_test_state();
        let store = state.transaction_store.clone();
        let server =
            TestServer::try_new(build_router(state)).expect("Could not create test server.");
        let body = b"{\"message\":\"Gasto, comida, bemb\xff\xfeos, 22.90, 4-2-25\"}".to_vec();

        let response = server
            .post(endpoints::WHATSAPP_WEBHOOK)
            .content_type("application/json")
            .bytes(Bytes::from(body))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_numeric_transaction_id_returns_json_bad_request() {
        let server = get_test_server();

        let response = server.delete("/api/transactions/abc").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["error"], "Invalid transaction ID");
        assert!(body["details"].is_string());
    }
}
