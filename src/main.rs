//! Server binary: reads configuration, then serves MCP over stdio.
//!
//! Configuration comes from flags or the environment (a `.env` file is read
//! first when present):
//! - `SHOPIFY_ACCESS_TOKEN` - Admin API access token (required)
//! - `MYSHOPIFY_DOMAIN` - store domain (required)
//! - `SHOPIFY_API_VERSION` - Admin API version (default `2025-10`)
//! - `SHOPIFY_REQUEST_TIMEOUT_SECS` - per-request timeout (default 30)

use std::process::ExitCode;

use clap::Parser;
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::EnvFilter;

use shopify_mcp::{ServerConfig, ShopifyMcpServer};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // stdout carries the MCP transport, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            tracing::warn!("Ignoring unreadable .env file: {e}");
        }
    }

    let args = ServerConfig::parse();
    let (credential, config) = match args.resolve() {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    tracing::info!(
        store = %credential.store,
        api_version = %config.api_version(),
        "Shopify MCP server starting"
    );

    let service = ShopifyMcpServer::new(credential, config)
        .serve(stdio())
        .await
        .inspect_err(|e| tracing::error!("MCP serve error: {e:?}"))?;

    service.waiting().await?;
    Ok(ExitCode::SUCCESS)
}
