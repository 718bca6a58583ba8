//! Defines an endpoint that creates a transaction from the already separated
//! fields of a WhatsApp message, for testing the integration by hand.
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;

use crate::{
    Error,
    app_state::WhatsAppState,
    transaction::NewTransaction,
    whatsapp::parser::parse_type,
};

/// The structured fields of a WhatsApp message.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct WhatsAppTestPayload {
    /// `Ingreso` or `Gasto`.
    #[serde(default, rename = "type")]
    pub transaction_type: Option<String>,
    /// A free-form category name.
    #[serde(default)]
    pub category: Option<String>,
    /// A text description of the transaction.
    #[serde(default)]
    pub description: Option<String>,
    /// A non-zero amount as a number or numeric string.
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub amount: Option<f64>,
    /// When the transaction happened.
    #[serde(default)]
    pub date: Option<String>,
}

/// A route handler that stores a transaction built from structured fields,
/// responds with 201 and the created transaction, or 400 if a field is
/// missing.
pub async fn whatsapp_test_endpoint(
    State(state): State<WhatsAppState>,
    body: Result<Json<WhatsAppTestPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match body {
        Ok(body) => body,
        Err(rejection) => return Error::from(rejection).into_response(),
    };

    tracing::info!("Received WhatsApp test request: {payload:?}");

    let new_transaction = match validate(payload, &state) {
        Ok(new_transaction) => new_transaction,
        Err(error) => return error.into_response(),
    };

    match state.transaction_store.create(new_transaction).await {
        Ok(transaction) => {
            tracing::info!("Test transaction {} added successfully", transaction.id);
            (
                StatusCode::CREATED,
                Json(json!({
                    "message": "Test transaction added successfully",
                    "transaction": transaction,
                })),
            )
                .into_response()
        }
        Err(error) => error.into_json_response("Failed to add test transaction"),
    }
}

fn validate(payload: WhatsAppTestPayload, state: &WhatsAppState) -> Result<NewTransaction, Error> {
    let mut missing = Vec::new();

    let transaction_type = required_text(payload.transaction_type, "type", &mut missing);
    let category = required_text(payload.category, "category", &mut missing);
    let description = required_text(payload.description, "description", &mut missing);
    let date = required_text(payload.date, "date", &mut missing);
    let amount = payload.amount.filter(|amount| *amount != 0.0);
    if amount.is_none() {
        missing.push("amount");
    }

    let (Some(transaction_type), Some(category), Some(description), Some(date), Some(amount)) =
        (transaction_type, category, description, date, amount)
    else {
        return Err(Error::MissingFields(missing));
    };

    let transaction_type =
        parse_type(&transaction_type, state.unknown_type_policy).map_err(Error::from)?;

    Ok(NewTransaction {
        description,
        amount,
        category,
        date,
        is_fixed: false,
        transaction_type,
    })
}

fn required_text(
    field: Option<String>,
    field_name: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<String> {
    match field.map(|text| text.trim().to_owned()) {
        Some(text) if !text.is_empty() => Some(text),
        _ => {
            missing.push(field_name);
            None
        }
    }
}

fn deserialize_optional_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Amount(#[serde(deserialize_with = "crate::transaction::deserialize_amount")] f64);

    Option::<Amount>::deserialize(deserializer).map(|amount| amount.map(|Amount(amount)| amount))
}
