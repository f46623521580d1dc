//! In-memory document database for development and tests
//!
//! Behaves like the managed service the page talks to: identifiers are
//! assigned on insert, partial updates merge fields, deletes are idempotent,
//! and every mutation pushes a complete snapshot to the collection's
//! subscribers.

use crate::config::BackendConfig;
use crate::core::events::{ChangeKind, DocumentChange, Snapshot, SnapshotBus};
use crate::core::facture::{Document, Fields};
use crate::core::service::{DocumentBackend, Subscription};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

type Collection = IndexMap<String, Fields>;

/// In-memory backend implementation
///
/// Uses RwLock for thread-safe access. Snapshots are published while the
/// write lock is held, so subscribers observe mutations in commit order.
#[derive(Clone)]
pub struct InMemoryBackend {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
    bus: SnapshotBus,
}

impl InMemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// Create an empty backend buffering `capacity` snapshots per subscriber
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            collections: Arc::new(RwLock::new(HashMap::new())),
            bus: SnapshotBus::new(capacity),
        }
    }

    /// Initialize the client from its connection settings
    pub fn connect(config: &BackendConfig, capacity: usize) -> Self {
        tracing::info!(
            project_id = %config.project_id,
            "document backend initialized (in-memory)"
        );
        Self::with_capacity(capacity)
    }

    fn documents_of(docs: Option<&Collection>) -> Vec<Document> {
        docs.map(|docs| {
            docs.iter()
                .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
                .collect()
        })
        .unwrap_or_default()
    }

    fn publish(&self, collection: &str, docs: Option<&Collection>, kind: ChangeKind, id: &str) {
        let change = DocumentChange {
            kind,
            document_id: id.to_string(),
        };
        self.bus.publish(Snapshot::new(
            collection,
            Self::documents_of(docs),
            vec![change],
        ));
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentBackend for InMemoryBackend {
    async fn add_document(&self, collection: &str, fields: Fields) -> Result<String> {
        let mut collections = self
            .collections
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let id = Uuid::new_v4().simple().to_string();
        let docs = collections.entry(collection.to_string()).or_default();
        docs.insert(id.clone(), fields);

        self.publish(collection, Some(&*docs), ChangeKind::Added, &id);

        Ok(id)
    }

    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let collections = self
            .collections
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document::new(id, fields.clone())))
    }

    async fn update_document(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
        let mut collections = self
            .collections
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let docs = collections
            .get_mut(collection)
            .ok_or_else(|| anyhow!("No document to update: {}/{}", collection, id))?;
        let stored = docs
            .get_mut(id)
            .ok_or_else(|| anyhow!("No document to update: {}/{}", collection, id))?;

        for (key, value) in fields {
            stored.insert(key, value);
        }

        self.publish(collection, Some(&*docs), ChangeKind::Modified, id);

        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<()> {
        let mut collections = self
            .collections
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let Some(docs) = collections.get_mut(collection) else {
            return Ok(());
        };

        // shift_remove keeps the remaining documents in insertion order
        if docs.shift_remove(id).is_some() {
            self.publish(collection, Some(&*docs), ChangeKind::Removed, id);
        }

        Ok(())
    }

    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>> {
        let collections = self
            .collections
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(Self::documents_of(collections.get(collection)))
    }

    async fn subscribe(&self, collection: &str) -> Result<Subscription> {
        let collections = self
            .collections
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        // Subscribing under the lock: no mutation can slip between the
        // initial snapshot and the first broadcast one.
        let rx = self.bus.subscribe();
        let initial =
            Snapshot::initial(collection, Self::documents_of(collections.get(collection)));

        Ok(Subscription::new(initial, rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::facture::Facture;
    use chrono::Utc;
    use serde_json::json;

    const COLLECTION: &str = "factures";

    #[tokio::test]
    async fn test_add_assigns_unique_ids() {
        let backend = InMemoryBackend::new();

        let a = backend
            .add_document(COLLECTION, Facture::edit_fields("INV-1", "Paid"))
            .await
            .unwrap();
        let b = backend
            .add_document(COLLECTION, Facture::edit_fields("INV-1", "Paid"))
            .await
            .unwrap();

        assert_ne!(a, b);
        assert_eq!(backend.list_documents(COLLECTION).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_get_missing_document() {
        let backend = InMemoryBackend::new();

        assert!(backend.get_document(COLLECTION, "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let backend = InMemoryBackend::new();
        let created_at = Utc::now();
        let id = backend
            .add_document(
                COLLECTION,
                Facture::creation_fields("INV-1", "Paid", created_at),
            )
            .await
            .unwrap();

        backend
            .update_document(COLLECTION, &id, Facture::edit_fields("INV-1", "Unpaid"))
            .await
            .unwrap();

        let doc = backend.get_document(COLLECTION, &id).await.unwrap().unwrap();
        assert_eq!(doc.fields["status"], json!("Unpaid"));
        assert_eq!(doc.fields["createdAt"], json!(created_at.to_rfc3339()));
    }

    #[tokio::test]
    async fn test_update_missing_document_fails() {
        let backend = InMemoryBackend::new();

        let result = backend
            .update_document(COLLECTION, "ghost", Facture::edit_fields("INV-1", "Paid"))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let backend = InMemoryBackend::new();
        let id = backend
            .add_document(COLLECTION, Facture::edit_fields("INV-1", "Paid"))
            .await
            .unwrap();

        backend.delete_document(COLLECTION, &id).await.unwrap();
        backend.delete_document(COLLECTION, &id).await.unwrap();
        backend.delete_document("unknown", &id).await.unwrap();

        assert!(backend.list_documents(COLLECTION).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_keeps_order_of_remaining_documents() {
        let backend = InMemoryBackend::new();
        let mut ids = Vec::new();
        for n in 1..=3 {
            ids.push(
                backend
                    .add_document(COLLECTION, Facture::edit_fields(&format!("INV-{n}"), "Paid"))
                    .await
                    .unwrap(),
            );
        }

        backend.delete_document(COLLECTION, &ids[0]).await.unwrap();

        let remaining: Vec<String> = backend
            .list_documents(COLLECTION)
            .await
            .unwrap()
            .into_iter()
            .map(|doc| doc.id)
            .collect();
        assert_eq!(remaining, vec![ids[1].clone(), ids[2].clone()]);
    }

    #[tokio::test]
    async fn test_subscription_sees_every_mutation() {
        let backend = InMemoryBackend::new();
        let mut subscription = backend.subscribe(COLLECTION).await.unwrap();

        let initial = subscription.next().await.unwrap();
        assert!(initial.is_empty());

        let id = backend
            .add_document(COLLECTION, Facture::edit_fields("INV-1", "Paid"))
            .await
            .unwrap();
        let added = subscription.next().await.unwrap();
        assert_eq!(added.len(), 1);
        assert_eq!(added.changes[0].kind, ChangeKind::Added);

        backend
            .update_document(COLLECTION, &id, Facture::edit_fields("INV-1", "Unpaid"))
            .await
            .unwrap();
        let modified = subscription.next().await.unwrap();
        assert_eq!(modified.changes[0].kind, ChangeKind::Modified);
        assert_eq!(modified.documents[0].fields["status"], json!("Unpaid"));

        backend.delete_document(COLLECTION, &id).await.unwrap();
        let removed = subscription.next().await.unwrap();
        assert!(removed.is_empty());
        assert_eq!(removed.changes[0].document_id, id);
    }

    #[tokio::test]
    async fn test_deleting_missing_document_publishes_nothing() {
        let backend = InMemoryBackend::new();
        let mut subscription = backend.subscribe(COLLECTION).await.unwrap();
        subscription.next().await.unwrap();

        backend.delete_document(COLLECTION, "ghost").await.unwrap();
        backend
            .add_document(COLLECTION, Facture::edit_fields("INV-1", "Paid"))
            .await
            .unwrap();

        // The first snapshot after the no-op delete is the insert.
        let next = subscription.next().await.unwrap();
        assert_eq!(next.changes[0].kind, ChangeKind::Added);
    }

    #[tokio::test]
    async fn test_initial_snapshot_reflects_existing_documents() {
        let backend = InMemoryBackend::new();
        backend
            .add_document(COLLECTION, Facture::edit_fields("INV-1", "Paid"))
            .await
            .unwrap();

        let mut subscription = backend.subscribe(COLLECTION).await.unwrap();
        let initial = subscription.next().await.unwrap();

        assert_eq!(initial.len(), 1);
        assert_eq!(initial.changes[0].kind, ChangeKind::Added);
    }
}
