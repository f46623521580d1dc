//! Server host holding the application state
//!
//! The host is created once at startup and lives as long as the process. It
//! owns the backend handle and hands it to the workflows and the listener
//! instead of exposing a global.

use crate::config::AppConfig;
use crate::core::error::FactureError;
use crate::core::service::DocumentBackend;
use crate::core::validation::FactureForm;
use crate::realtime::{TableFeed, listen_to_factures};
use crate::render::{PageView, Renderer};
use crate::workflows::{EditForm, FactureWorkflows};
use anyhow::Result;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Host context shared by every exposure
pub struct ServerHost {
    /// Application configuration
    pub config: Arc<AppConfig>,

    /// Document database client
    pub backend: Arc<dyn DocumentBackend>,

    /// Create, edit and delete workflows bound to the facture collection
    pub workflows: FactureWorkflows,

    /// Table and page templates
    pub renderer: Arc<Renderer>,

    /// Latest rendered facture table
    pub feed: TableFeed,
}

impl ServerHost {
    /// Build the host from builder components
    ///
    /// The table starts empty until the listener delivers its first snapshot.
    pub fn from_builder_components(
        config: AppConfig,
        backend: Arc<dyn DocumentBackend>,
    ) -> Result<Self, FactureError> {
        let renderer = Renderer::new(config.date_format.clone())?;
        let feed = TableFeed::new(renderer.render_table(&[])?);
        let workflows = FactureWorkflows::new(
            backend.clone(),
            config.collection.clone(),
            config.placeholder.clone(),
        );

        Ok(Self {
            config: Arc::new(config),
            backend,
            workflows,
            renderer: Arc::new(renderer),
            feed,
        })
    }

    /// Attach the real-time listener
    ///
    /// Every snapshot is rendered into a fresh table that replaces the
    /// previous one in the feed.
    pub async fn start_listener(&self) -> Result<JoinHandle<()>> {
        let renderer = self.renderer.clone();
        let feed = self.feed.clone();

        listen_to_factures(
            self.backend.clone(),
            &self.config.collection,
            move |factures| match renderer.render_table(&factures) {
                Ok(table) => {
                    feed.publish(table);
                }
                Err(err) => {
                    tracing::error!(error = %err, "failed to render facture table");
                }
            },
        )
        .await
    }

    /// Render the page around the current table
    pub fn render_page(
        &self,
        create_form: &FactureForm,
        edit_form: &EditForm,
        alert: Option<&str>,
    ) -> Result<String, FactureError> {
        let view = PageView::new(
            self.feed.current(),
            &self.config.statuses,
            &self.config.placeholder,
            create_form,
            edit_form,
            alert,
        );
        self.renderer.render_page(&view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryBackend;
    use std::time::Duration;

    fn make_host() -> ServerHost {
        ServerHost::from_builder_components(AppConfig::default(), Arc::new(InMemoryBackend::new()))
            .expect("should build host")
    }

    #[test]
    fn test_host_starts_with_empty_table() {
        let host = make_host();
        let table = host.feed.current();

        assert!(table.contains("<th>Number</th>"));
        assert!(!table.contains("<td>"));
    }

    #[test]
    fn test_invalid_date_format_fails_host() {
        let config = AppConfig {
            date_format: "%Q".to_string(),
            ..AppConfig::default()
        };

        let result = ServerHost::from_builder_components(config, Arc::new(InMemoryBackend::new()));
        assert!(matches!(result, Err(FactureError::Config(_))));
    }

    #[test]
    fn test_page_lists_configured_statuses() {
        let host = make_host();
        let page = host
            .render_page(&FactureForm::default(), &EditForm::hidden(), None)
            .unwrap();

        for status in &host.config.statuses {
            assert!(page.contains(&format!(r#"<option value="{}">"#, status)));
        }
        assert!(page.contains(r#"<option value="Choose a status" selected>"#));
    }

    #[tokio::test]
    async fn test_listener_refreshes_feed() {
        let host = make_host();
        let mut tables = host.feed.subscribe();
        host.start_listener().await.unwrap();

        host.workflows
            .create(&FactureForm::new("INV-1", "Paid"))
            .await
            .unwrap();

        tokio::time::timeout(Duration::from_secs(1), async {
            loop {
                tables.changed().await.unwrap();
                if tables.borrow_and_update().contains("INV-1") {
                    break;
                }
            }
        })
        .await
        .expect("table should show the new facture");
    }
}
