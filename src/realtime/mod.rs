//! Real-time listener and the published table
//!
//! ```text
//! DocumentBackend::subscribe ──▶ listen_to_factures (task) ──▶ on_change(Vec<Facture>)
//!                                                                  │
//!                                                       Renderer::render_table
//!                                                                  │
//!                                                 TableFeed (watch) ──▶ page / WebSocket clients
//! ```

use crate::core::events::Snapshot;
use crate::core::facture::Facture;
use crate::core::service::DocumentBackend;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Decode every document of a snapshot, keeping backend order
///
/// Documents that are not factures are skipped.
pub fn decode_snapshot(snapshot: &Snapshot) -> Vec<Facture> {
    snapshot
        .documents
        .iter()
        .filter_map(|document| match Facture::from_document(document) {
            Ok(facture) => Some(facture),
            Err(err) => {
                tracing::warn!(
                    collection = %snapshot.collection,
                    facture_id = %document.id,
                    error = %err,
                    "skipping undecodable document"
                );
                None
            }
        })
        .collect()
}

/// Attach a standing listener to the facture collection
///
/// `on_change` receives the complete, ordered contents of the collection for
/// the initial snapshot and after every change. The listener runs until the
/// backend closes the subscription.
pub async fn listen_to_factures<F>(
    backend: Arc<dyn DocumentBackend>,
    collection: &str,
    mut on_change: F,
) -> Result<JoinHandle<()>>
where
    F: FnMut(Vec<Facture>) + Send + 'static,
{
    let mut subscription = backend.subscribe(collection).await?;

    tracing::info!(collection = %collection, "listening to factures");

    Ok(tokio::spawn(async move {
        while let Some(snapshot) = subscription.next().await {
            tracing::debug!(
                collection = %snapshot.collection,
                documents = snapshot.len(),
                changes = snapshot.changes.len(),
                "snapshot received"
            );
            on_change(decode_snapshot(&snapshot));
        }

        tracing::debug!(collection = %subscription.collection(), "subscription closed");
    }))
}

/// The designated page region: latest rendered facture table
///
/// Cheap to clone. Publishing replaces the whole table; receivers are only
/// woken when the markup actually changed.
#[derive(Clone)]
pub struct TableFeed {
    sender: Arc<watch::Sender<String>>,
}

impl TableFeed {
    pub fn new(initial: String) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Replace the table; returns whether it differed from the previous one
    pub fn publish(&self, table: String) -> bool {
        self.sender.send_if_modified(|current| {
            if *current == table {
                false
            } else {
                *current = table;
                true
            }
        })
    }

    /// Current table markup
    pub fn current(&self) -> String {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.sender.subscribe()
    }
}
