use std::{
    fs::OpenOptions,
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use ahorrapp::{
    AppState, StorageConfig, build_router, graceful_shutdown, open_store,
    whatsapp::UnknownTypePolicy,
};

/// The REST API server for Ahorrapp.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The port to serve the API from.
    #[arg(short, long, env = "PORT", default_value_t = 3001)]
    port: u16,

    /// The address to listen on.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// File path to the SQLite database, created if it does not exist.
    #[arg(long, env = "DB_PATH", default_value = "ahorrapp.db")]
    db_path: PathBuf,

    /// A PostgreSQL connection string. Takes precedence over `--db-path`.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Reject WhatsApp messages whose type is neither "Ingreso" nor "Gasto"
    /// instead of treating them as income.
    #[arg(long)]
    strict_message_type: bool,

    /// Also write debug logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    setup_logging(args.log_file.as_deref());

    let storage_config = StorageConfig::new(args.db_path, args.database_url);
    let transaction_store = open_store(&storage_config)
        .await
        .expect("Could not open the database");

    let unknown_type_policy = if args.strict_message_type {
        UnknownTypePolicy::Strict
    } else {
        UnknownTypePolicy::DefaultToIncome
    };
    let app_state = AppState::new(transaction_store, unknown_type_policy);

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(app_state));
    let addr = SocketAddr::new(args.host, args.port);

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("Server stopped unexpectedly");
}

fn setup_logging(log_file: Option<&Path>) {
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(filter::LevelFilter::INFO);

    let debug_log = log_file.map(|path| {
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .expect("Could not create log file");

        tracing_subscriber::fmt::layer()
            .pretty()
            .with_writer(Arc::new(log_file))
            .with_filter(filter::LevelFilter::DEBUG)
    });

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Errors are logged where they are converted into responses.
        .on_failure(());

    router.layer(tracing_layer)
}
