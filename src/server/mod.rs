//! HTTP entry point.
//!
//! Serves the AgentCore service contract: `POST /invocations` answers one
//! utterance, `GET /ping` reports health.

mod routes;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::logging::Logger;
use crate::runtime::AgentRuntime;

pub use routes::ErrorResponse;

/// Default bind host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 8080;

/// HTTP server failures.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listen address could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Requested address.
        addr: SocketAddr,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Shared handler state.
#[derive(Clone)]
pub struct ServerState {
    runtime: Arc<dyn AgentRuntime>,
    logger: Logger,
}

impl ServerState {
    /// Wraps a runtime and the logger its handlers write to.
    pub fn new(runtime: Arc<dyn AgentRuntime>, logger: Logger) -> Self {
        Self { runtime, logger }
    }
}

/// Runs the rest of the stack with the server's logger as the dispatcher.
async fn with_logger(State(state): State<ServerState>, request: Request, next: Next) -> Response {
    state.logger.attach(next.run(request)).await
}

/// Builds the router.
///
/// Every request is traced (method, URI, status, latency) into the state's
/// logger.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/invocations", post(routes::invocations))
        .route("/ping", get(routes::ping))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn_with_state(state.clone(), with_logger))
        .with_state(state)
}

/// Binds `addr` and serves until `shutdown` resolves.
///
/// # Errors
///
/// [`ServerError::Bind`] when the address is taken, [`ServerError::Serve`]
/// when the accept loop fails.
pub async fn serve<F>(state: ServerState, addr: SocketAddr, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let logger = state.logger.clone();
    let runtime = state.runtime.name();

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    logger.in_scope(|| tracing::info!(%addr, runtime, "HTTP entry point listening"));

    let result = axum::serve(listener, router(state).into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve);

    logger.in_scope(|| tracing::info!("HTTP entry point stopped"));
    result
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
