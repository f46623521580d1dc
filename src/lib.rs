//! # Facture
//!
//! Real-time invoice (facture) management over a document database.
//!
//! ## Features
//!
//! - **Live table**: a standing subscription re-renders the whole facture
//!   table on every change of the collection
//! - **Create / edit / delete workflows**: one validated backend call per
//!   user action, last write wins
//! - **Pluggable backend**: any [`DocumentBackend`](core::DocumentBackend);
//!   an in-memory one ships behind the `in-memory` feature
//! - **Single page**: served with axum, table updates pushed over WebSocket
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use facture::prelude::*;
//!
//! let config = AppConfig::default();
//! let backend = InMemoryBackend::connect(&config.backend, config.event_capacity);
//!
//! ServerBuilder::new(config)
//!     .with_backend(backend)
//!     .serve()
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod realtime;
pub mod render;
pub mod server;
pub mod storage;
pub mod workflows;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        ChangeKind, Document, DocumentBackend, Facture, FactureError, FactureForm, Fields,
        Snapshot, Subscription, ValidationError,
    };

    // === Workflows & rendering ===
    pub use crate::realtime::{TableFeed, listen_to_factures};
    pub use crate::render::Renderer;
    pub use crate::workflows::{EditForm, FactureWorkflows};

    // === Storage ===
    #[cfg(feature = "in-memory")]
    pub use crate::storage::InMemoryBackend;

    // === Config ===
    pub use crate::config::{AppConfig, BackendConfig};

    // === Server ===
    pub use crate::server::{ServerBuilder, ServerHost};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
}
