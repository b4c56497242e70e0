//! Stockroom API server.
//!
//! Serves the stock ledger REST API on port 8888 by default.
//!
//! # Architecture
//!
//! - Axum handlers returning the `{success, message, data?}` envelope
//! - Service layer owning transactions and the stock mutation path
//! - `PostgreSQL` as the single source of truth for stock and history
//!
//! Migrations are NOT run automatically on startup. Run them explicitly
//! via: `cargo run -p stockroom-cli -- migrate`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{Span, field::Empty, info_span};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stockroom_server::config::ServerConfig;
use stockroom_server::middleware::request_id_middleware;
use stockroom_server::state::AppState;
use stockroom_server::{db, routes};

/// Initialize the tracing subscriber.
///
/// Defaults to info level for this crate if `RUST_LOG` is not set.
/// `STOCKROOM_LOG_JSON=true` switches to newline-delimited JSON with
/// flattened event fields, for log collectors.
fn init_tracing(config: &ServerConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "stockroom_server=info,tower_http=debug".into());

    let json_layer = config
        .log_json
        .then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!config.log_json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main]
async fn main() {
    let config = ServerConfig::from_env().expect("Failed to load configuration");

    init_tracing(&config);

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created");

    let state = AppState::new(config.clone(), pool);

    // The trace span declares request_id/status/latency_ms empty; the
    // request ID middleware and the response hook fill them in.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request| {
            info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = Empty,
                status = Empty,
                latency_ms = Empty,
            )
        })
        .on_response(|response: &Response, latency: Duration, span: &Span| {
            span.record("status", response.status().as_u16());
            span.record("latency_ms", u64::try_from(latency.as_millis()).unwrap_or(u64::MAX));
            tracing::debug!("finished processing request");
        });

    let app = Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api", routes::api_routes())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = config.socket_addr();
    tracing::info!("stockroom server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
