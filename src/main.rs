//! Facture server
//!
//! Usage: `facture [config.yaml]`. Without a path the built-in defaults are
//! used. Log verbosity follows `RUST_LOG`.

use anyhow::{Context, Result};
use facture::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("facture=info,tower_http=info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::from_yaml_file(&path)
            .with_context(|| format!("failed to load configuration from {}", path))?,
        None => AppConfig::default(),
    };

    let backend = InMemoryBackend::connect(&config.backend, config.event_capacity);

    ServerBuilder::new(config)
        .with_backend(backend)
        .serve()
        .await
}
