//! Middleware for logging requests and responses.

use axum::{
    Json,
    body::{Body, Bytes},
    extract::{FromRequest, Request},
    http::{StatusCode, request, response},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Bodies longer than this many bytes are truncated in `info` logs.
pub(crate) const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is truncated
/// and the full body is logged at the `debug` level.
///
/// Request bodies are read under axum's default body limit, larger bodies get
/// a 413. The bytes are passed on unchanged, only the logs are lossy UTF-8.
pub(crate) async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match <Bytes as FromRequest<()>>::from_request(Request::new(body), &()).await {
        Ok(body_bytes) => body_bytes,
        Err(rejection) => {
            tracing::warn!(
                "Could not read request body for {} {}: {rejection}",
                parts.method,
                parts.uri
            );
            return (
                rejection.status(),
                Json(json!({ "error": rejection.body_text() })),
            )
                .into_response();
        }
    };
    log_request(&parts, &String::from_utf8_lossy(&body_bytes));

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(body_bytes) => body_bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    log_response(&parts, &String::from_utf8_lossy(&body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

/// Cut `body` to at most [LOG_BODY_LENGTH_LIMIT] bytes without splitting a
/// character, returning `None` if it already fits.
fn truncate_body(body: &str) -> Option<&str> {
    if body.len() <= LOG_BODY_LENGTH_LIMIT {
        return None;
    }

    let end = body
        .char_indices()
        .map(|(index, _)| index)
        .take_while(|index| *index <= LOG_BODY_LENGTH_LIMIT)
        .last()
        .unwrap_or(0);

    Some(&body[..end])
}

fn log_request(parts: &request::Parts, body: &str) {
    let (method, uri) = (&parts.method, &parts.uri);

    match truncate_body(body) {
        Some(truncated) => {
            tracing::info!("Received request: {method} {uri}\nbody: {truncated}...");
            tracing::debug!("Full request body: {body:?}");
        }
        None => tracing::info!("Received request: {method} {uri}\nbody: {body:?}"),
    }
}

fn log_response(parts: &response::Parts, body: &str) {
    let status = parts.status;

    match truncate_body(body) {
        Some(truncated) => {
            tracing::info!("Sending response: {status}\nbody: {truncated}...");
            tracing::debug!("Full response body: {body:?}");
        }
        None => tracing::info!("Sending response: {status}\nbody: {body:?}"),
    }
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, body::Bytes, http::StatusCode, middleware, routing::post};
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use super::{LOG_BODY_LENGTH_LIMIT, logging_middleware, truncate_body};

    #[test]
    fn short_bodies_are_not_truncated() {
        assert_eq!(truncate_body("{\"message\":\"hola\"}"), None);
    }

    #[test]
    fn long_bodies_are_truncated_on_a_char_boundary() {
        let body = "í".repeat(LOG_BODY_LENGTH_LIMIT);

        let truncated = truncate_body(&body).expect("body should be truncated");

        assert!(truncated.len() <= LOG_BODY_LENGTH_LIMIT);
        assert!(truncated.chars().all(|c| c == 'í'));
    }

    #[tokio::test]
    async fn middleware_passes_body_through() {
        let app = Router::new()
            .route("/echo", post(|Json(body): Json<Value>| async move { Json(body) }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::try_new(app).expect("Could not create test server.");
        let body = json!({ "message": "Gasto, comida, bembos, 22.90, 4-2-25, una fecha muy larga" });

        let response = server.post("/echo").json(&body).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), body);
    }

    fn get_bytes_echo_server() -> TestServer {
        let app = Router::new()
            .route("/echo", post(|body: Bytes| async move { body }))
            .layer(middleware::from_fn(logging_middleware));

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn invalid_utf8_body_is_passed_through_unchanged() {
        let server = get_bytes_echo_server();
        let body = b"Gasto, comida, bemb\xff\xfeos, 22.90, 4-2-25".to_vec();

        let response = server.post("/echo").bytes(Bytes::from(body.clone())).await;

        response.assert_status_ok();
        assert_eq!(response.as_bytes().as_ref(), body.as_slice());
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let server = get_bytes_echo_server();
        let body = vec![b'a'; 3 * 1024 * 1024];

        let response = server.post("/echo").bytes(Bytes::from(body)).await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        assert!(response.json::<Value>()["error"].is_string());
    }
}
