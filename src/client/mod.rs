//! A client for the transaction API.
//!
//! [TransactionSync] keeps a local list of transactions that mirrors the
//! server, saves it to a [FallbackCache] file, and keeps working with local
//! data when the server cannot be reached.

mod alert;
mod api;
mod cache;
mod category;
mod deep_link;
mod error;
mod sample_data;
mod sync;

pub use alert::SyncWarning;
pub use api::{ApiClient, HealthStatus};
pub use cache::{CacheContents, FallbackCache};
pub use category::{CategoryList, DEFAULT_CATEGORIES};
pub use deep_link::whatsapp_link;
pub use error::ClientError;
pub use sample_data::sample_transactions;
pub use sync::{DivergencePolicy, SyncConfig, SyncSource, TransactionSync};
