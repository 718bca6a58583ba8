//! Ahorrapp is a personal finance tracker.
//!
//! This library provides:
//! - a JSON REST API for recording income and expenses, backed by SQLite or
//!   PostgreSQL,
//! - a parser and webhook that turn WhatsApp-style messages such as
//!   `Gasto, comida, bembos, 22.90, 4-2-25` into transactions,
//! - a [client] that keeps a local copy of the transactions in sync with the
//!   API and falls back to a cache file when the API cannot be reached.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod database_id;
mod db;
mod error;
mod health;
mod logging;
mod not_found;
mod routing;
mod transaction;

pub mod client;
pub mod endpoints;
pub mod whatsapp;

pub use app_state::AppState;
pub use database_id::TransactionId;
pub use db::{StorageConfig, open_store};
pub use error::Error;
pub use routing::build_router;
#[cfg(feature = "postgres")]
pub use transaction::PostgresTransactionStore;
pub use transaction::{
    NewTransaction, SQLiteTransactionStore, StorageBackend, Summary, Transaction,
    TransactionStore, TransactionType, UnknownTransactionType,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
