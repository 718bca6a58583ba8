//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}',
//! use [format_endpoint].

/// Liveness check that also reports the storage backend.
pub const HEALTH: &str = "/api/health";
/// Liveness check kept for older clients.
pub const STATUS: &str = "/api/status";
/// The route to list and create transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to update or delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route that turns a free-text WhatsApp message into a transaction.
pub const WHATSAPP_WEBHOOK: &str = "/api/whatsapp-webhook";
/// The route that creates a transaction from structured fields, for manual
/// testing of the WhatsApp flow.
pub const WHATSAPP_TEST: &str = "/api/whatsapp-test";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// Assumes that there is exactly one parameter wrapped in braces, e.g.
/// `{transaction_id}`. If there is no parameter, `endpoint_path` is returned
/// unchanged.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let (Some(start), Some(end)) = (endpoint_path.find('{'), endpoint_path.find('}')) else {
        return endpoint_path.to_owned();
    };

    format!("{}{}{}", &endpoint_path[..start], id, &endpoint_path[end + 1..])
}

#[cfg(test)]
mod tests {
    use super::{TRANSACTION, TRANSACTIONS_API, format_endpoint};

    #[test]
    fn formats_transaction_endpoint() {
        assert_eq!(format_endpoint(TRANSACTION, 42), "/api/transactions/42");
    }

    #[test]
    fn endpoint_without_parameter_is_unchanged() {
        assert_eq!(format_endpoint(TRANSACTIONS_API, 42), TRANSACTIONS_API);
    }
}
