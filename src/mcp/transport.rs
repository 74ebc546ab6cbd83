//! MCP transports: stdio and streamable HTTP.

use std::sync::Arc;

use rmcp::ServiceExt;
use rmcp::transport::io::stdio;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};

use super::server::FaqMcpServer;
use crate::logging::Logger;

/// Serves over stdin/stdout until the client disconnects.
///
/// Stdout carries protocol messages only; logs go to the logger's sink.
///
/// # Errors
///
/// Returns an error if the handshake fails or the session ends abnormally.
pub async fn serve_stdio(server: FaqMcpServer, logger: &Logger) -> anyhow::Result<()> {
    logger
        .attach(async move {
            tracing::info!("MCP server on stdio");
            let service = server.serve(stdio()).await?;
            let reason = service.waiting().await?;
            tracing::info!(?reason, "MCP session ended");
            Ok::<(), anyhow::Error>(())
        })
        .await
}

/// Serves streamable HTTP at `http://{host}:{port}/mcp` until Ctrl-C.
///
/// Every session shares the same tool set.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve_http(server: FaqMcpServer, host: &str, port: u16, logger: &Logger) -> anyhow::Result<()> {
    serve_http_until(server, host, port, logger, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

/// [`serve_http`] with a caller-supplied shutdown signal.
pub(crate) async fn serve_http_until<F>(
    server: FaqMcpServer,
    host: &str,
    port: u16,
    logger: &Logger,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let ct = tokio_util::sync::CancellationToken::new();

    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig {
            cancellation_token: ct.child_token(),
            ..Default::default()
        },
    );

    let router = axum::Router::new().nest_service("/mcp", service);
    let tcp_listener = tokio::net::TcpListener::bind(format!("{host}:{port}")).await?;
    let addr = tcp_listener.local_addr()?;

    logger
        .attach(async move {
            tracing::info!(%addr, "MCP server listening on http://{addr}/mcp");
            axum::serve(tcp_listener, router)
                .with_graceful_shutdown(async move {
                    shutdown.await;
                    ct.cancel();
                })
                .await?;
            tracing::info!(%addr, "MCP server stopped");
            Ok::<(), anyhow::Error>(())
        })
        .await
}
