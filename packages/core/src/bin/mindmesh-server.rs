//! MindMesh server binary
//!
//! Serves the HTTP/WebSocket API over the in-memory store with the bundled
//! placeholder inference provider, so the stack runs end-to-end without
//! external credentials. Deployments swap in a durable `MapStore` and a real
//! `InferenceClient`.

use anyhow::Context;
use mindmesh_ai_engine::{EchoClient, InferenceConfig};
use mindmesh_core::{build_router, AppState, MemoryStore};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "127.0.0.1:3100";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = InferenceConfig::default();
    config.validate().context("invalid inference config")?;

    let state = Arc::new(AppState::new(
        Arc::new(MemoryStore::new()),
        Arc::new(EchoClient),
        config,
    ));

    let addr = std::env::var("MINDMESH_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(%addr, "mindmesh server listening");

    axum::serve(listener, build_router(state))
        .await
        .context("server terminated")?;
    Ok(())
}
