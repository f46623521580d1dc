//! ServerBuilder for fluent API to build the facture server

use super::exposure::{PageExposure, WebSocketExposure};
use super::host::ServerHost;
use crate::config::AppConfig;
use crate::core::service::DocumentBackend;
use anyhow::{Result, anyhow};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Builder for the facture server
///
/// # Example
///
/// ```ignore
/// ServerBuilder::new(AppConfig::default())
///     .with_backend(InMemoryBackend::new())
///     .serve()
///     .await?;
/// ```
pub struct ServerBuilder {
    config: AppConfig,
    backend: Option<Arc<dyn DocumentBackend>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            backend: None,
            custom_routes: Vec::new(),
        }
    }

    /// Set the document backend (required)
    pub fn with_backend(self, backend: impl DocumentBackend + 'static) -> Self {
        self.with_shared_backend(Arc::new(backend))
    }

    /// Set a backend that is also used elsewhere
    pub fn with_shared_backend(mut self, backend: Arc<dyn DocumentBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Add routes next to the page and WebSocket ones
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the host and attach the real-time listener
    pub async fn build_host(self) -> Result<Arc<ServerHost>> {
        let (host, _) = self.into_parts().await?;
        Ok(host)
    }

    /// Build the complete router
    pub async fn build(self) -> Result<Router> {
        let (host, custom_routes) = self.into_parts().await?;
        Ok(Self::router(host, custom_routes))
    }

    /// Assemble the router for an existing host
    pub fn router(host: Arc<ServerHost>, custom_routes: Vec<Router>) -> Router {
        let mut app = PageExposure::build_router(host.clone())
            .merge(WebSocketExposure::build_router(host));

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
    }

    async fn into_parts(self) -> Result<(Arc<ServerHost>, Vec<Router>)> {
        let backend = self
            .backend
            .ok_or_else(|| anyhow!("Backend is required. Call .with_backend() first"))?;

        let host = Arc::new(ServerHost::from_builder_components(self.config, backend)?);
        // The listener task lives for the rest of the process.
        host.start_listener().await?;

        Ok((host, self.custom_routes))
    }

    /// Serve the page on the configured address with graceful shutdown
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.bind.clone();
        let app = self.build().await?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryBackend;

    #[tokio::test]
    async fn test_build_requires_backend() {
        let result = ServerBuilder::new(AppConfig::default()).build().await;

        let err = result.err().unwrap();
        assert!(err.to_string().contains("Backend is required"));
    }

    #[tokio::test]
    async fn test_build_host_uses_config() {
        let config = AppConfig {
            collection: "invoices".to_string(),
            ..AppConfig::default()
        };

        let host = ServerBuilder::new(config)
            .with_backend(InMemoryBackend::new())
            .build_host()
            .await
            .unwrap();

        assert_eq!(host.workflows.collection(), "invoices");
    }

    #[tokio::test]
    async fn test_build_with_custom_routes() {
        use axum::routing::get;

        let custom = Router::new().route("/custom", get(|| async { "ok" }));
        let result = ServerBuilder::new(AppConfig::default())
            .with_backend(InMemoryBackend::new())
            .with_custom_routes(custom)
            .build()
            .await;

        assert!(result.is_ok());
    }
}
