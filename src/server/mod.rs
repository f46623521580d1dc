//! Server module for hosting the facture page
//!
//! This module provides a `ServerBuilder` that wires:
//! - the backend handle and the real-time listener
//! - the page and its form endpoints
//! - the WebSocket table stream

pub mod builder;
pub mod exposure;
pub mod host;

pub use builder::ServerBuilder;
pub use host::ServerHost;
