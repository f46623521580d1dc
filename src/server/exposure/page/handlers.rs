//! Page and form handlers
//!
//! Successful submissions redirect back to the page (303). A rejected form
//! re-renders the page with a blocking alert and the values as typed. Backend
//! failures on create and edit are logged by the workflows; the page comes
//! back unchanged with no user-facing error.

use crate::core::error::FactureError;
use crate::core::validation::FactureForm;
use crate::server::host::ServerHost;
use crate::workflows::{ALERT_MESSAGE, EditForm};
use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;
use std::sync::Arc;

/// Body of the edit form
#[derive(Debug, Deserialize)]
pub struct EditSubmission {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub status: String,
}

fn page(
    host: &ServerHost,
    status: StatusCode,
    create_form: &FactureForm,
    edit_form: &EditForm,
    alert: Option<&str>,
) -> Response {
    match host.render_page(create_form, edit_form, alert) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to render page");
            err.into_response()
        }
    }
}

/// GET /
pub async fn index(State(host): State<Arc<ServerHost>>) -> Response {
    page(
        &host,
        StatusCode::OK,
        &FactureForm::default(),
        &EditForm::hidden(),
        None,
    )
}

/// POST /factures
pub async fn create_facture(
    State(host): State<Arc<ServerHost>>,
    Form(form): Form<FactureForm>,
) -> Response {
    match host.workflows.create(&form).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(FactureError::Validation(_)) => page(
            &host,
            StatusCode::UNPROCESSABLE_ENTITY,
            &form,
            &EditForm::hidden(),
            Some(ALERT_MESSAGE),
        ),
        Err(_) => page(&host, StatusCode::OK, &form, &EditForm::hidden(), None),
    }
}

/// GET /factures/{id}/edit
pub async fn edit_facture(
    State(host): State<Arc<ServerHost>>,
    Path(id): Path<String>,
) -> Response {
    let mut edit_form = EditForm::hidden();

    // Not-found and fetch failures are logged by the workflow; the form
    // simply stays hidden.
    let _ = host.workflows.edit_facture(&mut edit_form, &id).await;

    page(
        &host,
        StatusCode::OK,
        &FactureForm::default(),
        &edit_form,
        None,
    )
}

/// POST /factures/edit
pub async fn submit_edit(
    State(host): State<Arc<ServerHost>>,
    Form(submission): Form<EditSubmission>,
) -> Response {
    let mut edit_form =
        EditForm::submitted(submission.id, submission.number, submission.status);

    match host.workflows.submit_edit(&mut edit_form).await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(FactureError::Validation(_)) => page(
            &host,
            StatusCode::UNPROCESSABLE_ENTITY,
            &FactureForm::default(),
            &edit_form,
            Some(ALERT_MESSAGE),
        ),
        Err(_) => page(
            &host,
            StatusCode::OK,
            &FactureForm::default(),
            &edit_form,
            None,
        ),
    }
}

/// POST /factures/{id}/delete
pub async fn delete_facture(
    State(host): State<Arc<ServerHost>>,
    Path(id): Path<String>,
) -> Response {
    match host.workflows.delete(&id).await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(err) => {
            tracing::error!(facture_id = %id, error = %err, "unhandled error while deleting facture");
            err.into_response()
        }
    }
}
