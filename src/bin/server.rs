use std::{env, net::SocketAddr};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use ledgerly::{
    PaginationConfig, TracingMailer, build_router, create_app_state, graceful_shutdown,
    logging_middleware,
};

/// The REST API server for ledgerly.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    /// Pass ':memory:' for a database that is lost when the server stops.
    #[arg(long)]
    db_path: String,

    /// The address and port to serve the API from.
    #[arg(long, default_value = "0.0.0.0:3000")]
    address: String,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr: SocketAddr = args
        .address
        .parse()
        .expect("The address must be in the form 'host:port', e.g. '0.0.0.0:3000'.");

    let secret = env::var("SECRET").expect("The environment variable 'SECRET' must be set");

    let db_connection =
        Connection::open(&args.db_path).expect("Could not open the database file.");
    let state = create_app_state(
        db_connection,
        &secret,
        PaginationConfig::default(),
        TracingMailer,
    )
    .expect("Could not create the database tables.");

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router =
        add_tracing_layer(build_router(state).layer(middleware::from_fn(logging_middleware)));

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("Server stopped unexpectedly.");
}

fn setup_logging() {
    // RUST_LOG overrides the default filter, e.g. RUST_LOG=ledgerly=trace.
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ledgerly=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();
            let version = req.version();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, ?version, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
