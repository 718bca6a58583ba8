//! Database ID type definition.

/// Alias for the integer type used for transaction IDs.
///
/// IDs are assigned by the storage layer (or by the client's local fallback)
/// and are never reused within one store.
pub type TransactionId = i64;
