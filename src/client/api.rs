//! A typed HTTP client for the transaction API.

use std::time::Duration;

use reqwest::{Response, StatusCode, Url};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;

use crate::{
    NewTransaction, Transaction, TransactionId,
    client::ClientError,
    endpoints::{self, format_endpoint},
};

/// The body of a health check response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    /// "ok" when the server is running.
    pub status: String,
    /// The storage backend, "SQLite" or "PostgreSQL".
    pub database: String,
}

/// The body of a successful WhatsApp webhook response.
#[derive(Debug, Deserialize)]
struct WebhookResponse {
    transaction: Transaction,
}

/// The `error` field sent by the API with every error response.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Sends requests to the transaction API. Every request is bounded by the
/// timeout given to [ApiClient::new].
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a client for the API served at `base_url`, e.g.
    /// `http://localhost:3001`.
    ///
    /// # Errors
    /// Returns [ClientError::InvalidUrl] if `base_url` is not a valid URL.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|error| ClientError::InvalidUrl(format!("{base_url}: {error}")))?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { base_url, http })
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|error| ClientError::InvalidUrl(format!("{path}: {error}")))
    }

    /// Check that the server is running.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let response = self.http.get(self.url(endpoints::HEALTH)?).send().await?;

        parse_json(response).await
    }

    /// Fetch every transaction, newest first.
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>, ClientError> {
        let response = self
            .http
            .get(self.url(endpoints::TRANSACTIONS_API)?)
            .send()
            .await?;

        parse_json(response).await
    }

    /// Create a transaction and return it as stored by the server.
    pub async fn create_transaction(
        &self,
        transaction: &NewTransaction,
    ) -> Result<Transaction, ClientError> {
        let response = self
            .http
            .post(self.url(endpoints::TRANSACTIONS_API)?)
            .json(transaction)
            .send()
            .await?;

        parse_json(response).await
    }

    /// Replace the transaction with `id` and return it as stored by the server.
    pub async fn update_transaction(
        &self,
        id: TransactionId,
        transaction: &NewTransaction,
    ) -> Result<Transaction, ClientError> {
        let response = self
            .http
            .put(self.url(&format_endpoint(endpoints::TRANSACTION, id))?)
            .json(transaction)
            .send()
            .await?;

        parse_json(response).await
    }

    /// Delete the transaction with `id`.
    pub async fn delete_transaction(&self, id: TransactionId) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&format_endpoint(endpoints::TRANSACTION, id))?)
            .send()
            .await?;

        check_status(response).await.map(|_| ())
    }

    /// Post a free-text message to the WhatsApp webhook, the way a message
    /// relay would, and return the transaction the server created from it.
    pub async fn send_whatsapp_message(&self, message: &str) -> Result<Transaction, ClientError> {
        let response = self
            .http
            .post(self.url(endpoints::WHATSAPP_WEBHOOK)?)
            .json(&json!({ "message": message }))
            .send()
            .await?;

        parse_json::<WebhookResponse>(response)
            .await
            .map(|body| body.transaction)
    }
}

async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .map(|body| body.error)
        .unwrap_or_default();

    match status {
        StatusCode::NOT_FOUND => Err(ClientError::NotFound),
        StatusCode::BAD_REQUEST => Err(ClientError::Rejected(message)),
        status => Err(ClientError::Status { status, message }),
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let response = check_status(response).await?;

    Ok(response.json::<T>().await?)
}
