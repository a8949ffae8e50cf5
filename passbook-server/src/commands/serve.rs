//! Serve command - run the HTTP API

use std::path::Path;

use anyhow::{Context, Result};

use passbook_core::PassbookContext;
use passbook_server::build_router;

pub async fn run(data_dir: &Path, listen: Option<String>) -> Result<()> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    let context =
        PassbookContext::new(data_dir).context("Failed to initialize passbook context")?;
    let listen_addr = listen.unwrap_or_else(|| context.config.listen_addr.clone());

    let router = build_router(context);

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", listen_addr))?;
    tracing::info!(addr = %listen_addr, "passbook api listening");

    axum::serve(listener, router)
        .await
        .context("Server error")?;

    Ok(())
}
