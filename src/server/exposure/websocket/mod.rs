//! WebSocket table stream
//!
//! ```text
//! listener ──▶ Renderer ──▶ TableFeed (watch) ──▶ /ws ──▶ page replaces #idFacture
//! ```
//!
//! Each connection first receives the current table, then one text frame
//! per table change. Every frame is a complete table: clients replace the
//! container's whole subtree and never append.

mod handler;

use crate::server::host::ServerHost;
use axum::{Router, routing::get};
use std::sync::Arc;

pub struct WebSocketExposure;

impl WebSocketExposure {
    /// Build the router with the `/ws` endpoint
    pub fn build_router(host: Arc<ServerHost>) -> Router {
        Router::new()
            .route("/ws", get(handler::ws_handler))
            .with_state(host)
    }
}
