//! Page exposure
//!
//! Serves the facture page and the endpoints its forms submit to. Row
//! controls are plain forms, so a freshly rendered table carries its own
//! actions and nothing has to be re-bound after a render.

mod handlers;

use crate::server::host::ServerHost;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::Arc;

pub struct PageExposure;

impl PageExposure {
    /// Build the page router
    ///
    /// | Method | Path                    | Action                  |
    /// |--------|-------------------------|-------------------------|
    /// | GET    | `/`                     | page                    |
    /// | POST   | `/factures`             | create                  |
    /// | GET    | `/factures/{id}/edit`   | load the edit form      |
    /// | POST   | `/factures/edit`        | submit the edit form    |
    /// | POST   | `/factures/{id}/delete` | delete                  |
    pub fn build_router(host: Arc<ServerHost>) -> Router {
        let page_routes = Router::new()
            .route("/", get(handlers::index))
            .route("/factures", post(handlers::create_facture))
            .route("/factures/edit", post(handlers::submit_edit))
            .route("/factures/{id}/edit", get(handlers::edit_facture))
            .route("/factures/{id}/delete", post(handlers::delete_facture))
            .with_state(host);

        Self::health_routes().merge(page_routes)
    }

    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "facture"
        }))
    }
}
