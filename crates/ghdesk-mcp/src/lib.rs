// SPDX-License-Identifier: Apache-2.0

//! MCP server exposing ghdesk GitHub issue, repository and organization tools.
//!
//! This crate wraps the ghdesk-core operations as MCP tools using the RMCP
//! Rust SDK, served over stdio or streamable HTTP.

mod auth;
mod error;
mod logging;
mod server;

pub use auth::EnvTokenProvider;
pub use logging::init_logging;
pub use server::{
    CreateIssueParams, CredentialStatus, GetIssueParams, GhDeskServer, HealthCheckParams,
    HealthCheckResponse, ListIssuesParams, ListOrganizationsParams, ListRepositoriesParams,
    UpdateIssueParams,
};

/// Run the MCP server over stdio transport.
///
/// Serves the MCP protocol over stdin/stdout.
pub async fn run_stdio() -> anyhow::Result<()> {
    use rmcp::{ServiceExt, transport::stdio};

    tracing::info!("Starting ghdesk MCP server (stdio)");

    let server = GhDeskServer::new();
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Server error: {:?}", e);
    })?;

    service.waiting().await?;
    Ok(())
}

/// Run the MCP server over HTTP transport.
///
/// Starts an HTTP server on the specified host and port, serving the MCP protocol
/// at the /mcp endpoint. Gracefully shuts down on Ctrl+C.
pub async fn run_http(host: &str, port: u16) -> anyhow::Result<()> {
    use axum::Router;
    use rmcp::transport::streamable_http_server::{
        StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
    };
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tokio::net::TcpListener;

    tracing::info!("Starting ghdesk MCP HTTP server on {}:{}", host, port);

    let server = GhDeskServer::new();
    let session_manager = Arc::new(LocalSessionManager::default());
    let config = StreamableHttpServerConfig::default();

    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        session_manager,
        config,
    );

    let router = Router::new().nest_service("/mcp", service);

    let addr: SocketAddr = if host.contains(':') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
    .parse()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl+C: {}", e);
                return;
            }
            tracing::info!("Received Ctrl+C, shutting down gracefully");
        })
        .await?;

    Ok(())
}
