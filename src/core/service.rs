//! Document database surface consumed by the workflows

use crate::core::events::Snapshot;
use crate::core::facture::{Document, Fields};
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Client of a document database
///
/// Implementations own the storage and the real-time fan-out; the rest of the
/// crate only sees collections of schemaless documents addressed by opaque
/// string identifiers.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Insert a new document and return the identifier the backend assigned
    async fn add_document(&self, collection: &str, fields: Fields) -> Result<String>;

    /// Read a single document
    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Merge `fields` into an existing document
    ///
    /// Fields not named in `fields` are left untouched. Fails when the
    /// document does not exist.
    async fn update_document(&self, collection: &str, id: &str, fields: Fields) -> Result<()>;

    /// Remove a document
    ///
    /// Removing a document that does not exist succeeds.
    async fn delete_document(&self, collection: &str, id: &str) -> Result<()>;

    /// Current contents of a collection, in backend order
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>>;

    /// Open a standing subscription on a collection
    ///
    /// The first snapshot yielded is the current contents; every later one
    /// follows a mutation of the collection.
    async fn subscribe(&self, collection: &str) -> Result<Subscription>;
}

/// A live subscription on one collection
///
/// Yields complete snapshots. When the receiver falls behind, intermediate
/// snapshots are skipped: the next one delivered still describes the whole
/// collection.
pub struct Subscription {
    collection: String,
    initial: Option<Snapshot>,
    rx: broadcast::Receiver<Snapshot>,
}

impl Subscription {
    pub fn new(initial: Snapshot, rx: broadcast::Receiver<Snapshot>) -> Self {
        Self {
            collection: initial.collection.clone(),
            initial: Some(initial),
            rx,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Wait for the next snapshot
    ///
    /// Returns `None` once the backend has gone away.
    pub async fn next(&mut self) -> Option<Snapshot> {
        if let Some(initial) = self.initial.take() {
            return Some(initial);
        }

        loop {
            match self.rx.recv().await {
                Ok(snapshot) if snapshot.collection == self.collection => return Some(snapshot),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        collection = %self.collection,
                        skipped,
                        "subscription lagged, skipping to the latest snapshot"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
