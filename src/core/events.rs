//! Snapshot fan-out for real-time collection listeners
//!
//! Every mutation of a collection produces a [`Snapshot`]: the complete,
//! ordered contents of that collection right after the change, plus the list
//! of document changes that led to it. Snapshots travel over a
//! `tokio::sync::broadcast` channel so that any number of listeners can follow
//! a collection without coordinating with writers.
//!
//! ```text
//! add / update / delete ──▶ SnapshotBus::publish() ──▶ broadcast ──▶ Subscription (collection A)
//!                                                                ──▶ Subscription (collection B)
//! ```

use crate::core::facture::Document;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Kind of change applied to a single document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

/// One document change carried by a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChange {
    pub kind: ChangeKind,
    pub document_id: String,
}

/// A complete point-in-time view of a collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Collection this snapshot belongs to
    pub collection: String,
    /// All documents, in backend order
    pub documents: Vec<Document>,
    /// Changes since the previous snapshot (every document is `Added` in the
    /// initial snapshot)
    pub changes: Vec<DocumentChange>,
    /// When the backend produced the view
    pub read_time: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(
        collection: impl Into<String>,
        documents: Vec<Document>,
        changes: Vec<DocumentChange>,
    ) -> Self {
        Self {
            collection: collection.into(),
            documents,
            changes,
            read_time: Utc::now(),
        }
    }

    /// Initial snapshot delivered on subscription
    pub fn initial(collection: impl Into<String>, documents: Vec<Document>) -> Self {
        let changes = documents
            .iter()
            .map(|doc| DocumentChange {
                kind: ChangeKind::Added,
                document_id: doc.id.clone(),
            })
            .collect();
        Self::new(collection, documents, changes)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Broadcast-based snapshot bus
///
/// Cheap to clone (the sender is reference counted) and shared by every
/// collection of a backend; receivers filter on [`Snapshot::collection`].
#[derive(Debug, Clone)]
pub struct SnapshotBus {
    sender: broadcast::Sender<Snapshot>,
}

impl SnapshotBus {
    /// Create a bus buffering up to `capacity` snapshots per slow receiver
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish a snapshot to all subscribers
    ///
    /// Never fails; returns the number of receivers reached (0 when nobody
    /// listens).
    pub fn publish(&self, snapshot: Snapshot) -> usize {
        self.sender.send(snapshot).unwrap_or(0)
    }

    /// Receive every snapshot published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for SnapshotBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::facture::Fields;

    fn doc(id: &str) -> Document {
        Document::new(id, Fields::new())
    }

    #[test]
    fn test_initial_snapshot_marks_everything_added() {
        let snapshot = Snapshot::initial("factures", vec![doc("a"), doc("b")]);

        assert_eq!(snapshot.len(), 2);
        assert!(
            snapshot
                .changes
                .iter()
                .all(|change| change.kind == ChangeKind::Added)
        );
        assert_eq!(snapshot.changes[1].document_id, "b");
    }

    #[test]
    fn test_change_kind_serialization() {
        let json = serde_json::to_value(ChangeKind::Removed).unwrap();
        assert_eq!(json, "removed");
    }

    #[tokio::test]
    async fn test_bus_publish_subscribe() {
        let bus = SnapshotBus::new(8);
        let mut rx = bus.subscribe();

        let reached = bus.publish(Snapshot::initial("factures", vec![doc("a")]));
        assert_eq!(reached, 1);

        let received = rx.recv().await.unwrap();
        assert_eq!(received.collection, "factures");
        assert_eq!(received.documents[0].id, "a");
    }

    #[tokio::test]
    async fn test_bus_multiple_subscribers() {
        let bus = SnapshotBus::new(8);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.receiver_count(), 2);

        bus.publish(Snapshot::initial("factures", vec![]));

        assert!(rx1.recv().await.unwrap().is_empty());
        assert!(rx2.recv().await.unwrap().is_empty());
    }

    #[test]
    fn test_bus_publish_without_subscribers() {
        let bus = SnapshotBus::default();
        assert_eq!(bus.publish(Snapshot::initial("factures", vec![])), 0);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let bus = SnapshotBus::new(0);
        let _rx = bus.subscribe();
        assert_eq!(bus.receiver_count(), 1);
    }
}
