//! Core module containing the facture model, backend trait and errors

pub mod error;
pub mod events;
pub mod facture;
pub mod service;
pub mod validation;

pub use error::{FactureError, ValidationError};
pub use events::{ChangeKind, DocumentChange, Snapshot, SnapshotBus};
pub use facture::{Document, Facture, Fields};
pub use service::{DocumentBackend, Subscription};
pub use validation::FactureForm;
