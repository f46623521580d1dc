//! Create, edit and delete workflows
//!
//! Each workflow is one user action: validate what the form holds, make a
//! single backend call, and log the outcome. Nothing is retried; a failed
//! call is terminal for that action and the user repeats it if needed. The
//! rendered table is never touched here: the change shows up once the next
//! snapshot arrives.

mod edit_form;

pub use edit_form::EditForm;

use crate::core::error::{FactureError, ValidationError};
use crate::core::facture::Facture;
use crate::core::service::DocumentBackend;
use crate::core::validation::{FactureForm, validate_document_id};
use chrono::Utc;
use std::sync::Arc;

/// Message shown to the user when a submitted form is rejected
pub const ALERT_MESSAGE: &str = "Please fill in all fields correctly.";

/// Facture workflows bound to one backend collection
#[derive(Clone)]
pub struct FactureWorkflows {
    backend: Arc<dyn DocumentBackend>,
    collection: String,
    placeholder: String,
}

impl FactureWorkflows {
    /// * `collection` - collection holding the factures
    /// * `placeholder` - status selector option that means "no selection"
    pub fn new(
        backend: Arc<dyn DocumentBackend>,
        collection: impl Into<String>,
        placeholder: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            collection: collection.into(),
            placeholder: placeholder.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Insert a new facture from the create form
    ///
    /// Returns the identifier assigned by the backend. A rejected form never
    /// reaches the backend; a failed insert is logged and returned.
    pub async fn create(&self, form: &FactureForm) -> Result<String, FactureError> {
        tracing::debug!("submit add facture");
        form.check(&self.placeholder)?;

        let fields = Facture::creation_fields(&form.number, &form.status, Utc::now());

        match self.backend.add_document(&self.collection, fields).await {
            Ok(id) => {
                tracing::info!(facture_id = %id, collection = %self.collection, "facture added");
                Ok(id)
            }
            Err(err) => {
                tracing::error!(
                    collection = %self.collection,
                    error = %format!("{:#}", err),
                    "failed to add facture"
                );
                Err(FactureError::backend("add", err))
            }
        }
    }

    /// Load a facture into the edit form and show it
    ///
    /// When the facture does not exist the form is left exactly as it was.
    pub async fn edit_facture(&self, form: &mut EditForm, id: &str) -> Result<(), FactureError> {
        if validate_document_id(id).is_err() {
            tracing::info!(facture_id = %id, "no facture found with this id");
            return Err(FactureError::NotFound { id: id.to_string() });
        }

        let document = match self.backend.get_document(&self.collection, id).await {
            Ok(Some(document)) => document,
            Ok(None) => {
                tracing::info!(facture_id = %id, "no facture found with this id");
                return Err(FactureError::NotFound { id: id.to_string() });
            }
            Err(err) => {
                tracing::error!(
                    facture_id = %id,
                    error = %format!("{:#}", err),
                    "failed to fetch facture"
                );
                return Err(FactureError::backend("get", err));
            }
        };

        let facture = Facture::from_document(&document).map_err(|err| {
            tracing::error!(
                facture_id = %id,
                error = %format!("{:#}", err),
                "failed to fetch facture"
            );
            FactureError::backend("get", err)
        })?;

        form.load(&facture);
        Ok(())
    }

    /// Push the edit form's values to the facture it holds
    ///
    /// Only `number` and `status` are written. The form is hidden once the
    /// update succeeds and stays as submitted otherwise.
    pub async fn submit_edit(&self, form: &mut EditForm) -> Result<(), FactureError> {
        let id = form.id.clone();
        if id.is_empty() {
            return Err(ValidationError::MissingIdentifier.into());
        }

        let input = form.input();
        input.check(&self.placeholder)?;
        validate_document_id(&id)?;

        let patch = Facture::edit_fields(&input.number, &input.status);

        match self
            .backend
            .update_document(&self.collection, &id, patch)
            .await
        {
            Ok(()) => {
                tracing::info!(facture_id = %id, "facture updated");
                form.hide();
                Ok(())
            }
            Err(err) => {
                tracing::error!(
                    facture_id = %id,
                    error = %format!("{:#}", err),
                    "failed to update facture"
                );
                Err(FactureError::backend("update", err))
            }
        }
    }

    /// Delete a facture
    ///
    /// Deleting an identifier that no longer exists succeeds. Failures are
    /// returned to the caller without being logged here.
    pub async fn delete(&self, id: &str) -> Result<(), FactureError> {
        validate_document_id(id)?;

        self.backend
            .delete_document(&self.collection, id)
            .await
            .map_err(|err| FactureError::backend("delete", err))?;

        tracing::info!(facture_id = %id, "facture deleted");
        Ok(())
    }
}
