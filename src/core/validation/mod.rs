//! Form-boundary validation
//!
//! The backend accepts any document, so the only guard on facture data is the
//! check applied to submitted forms: both fields present and a real status
//! chosen in the selector.

pub mod validators;

use crate::core::error::ValidationError;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub use validators::validate_document_id;

/// Values submitted by the create and edit forms
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct FactureForm {
    #[serde(default)]
    #[validate(length(min = 1, code = "required"))]
    pub number: String,

    #[serde(default)]
    #[validate(length(min = 1, code = "required"))]
    pub status: String,
}

impl FactureForm {
    pub fn new(number: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            status: status.into(),
        }
    }

    /// Check the form against the selector's placeholder option
    pub fn check(&self, placeholder: &str) -> Result<(), ValidationError> {
        if let Err(errors) = self.validate() {
            let fields = errors.field_errors();
            let field = ["number", "status"]
                .into_iter()
                .find(|name| fields.contains_key(*name))
                .unwrap_or("number");
            return Err(ValidationError::Required {
                field: field.to_string(),
            });
        }

        if self.status == placeholder {
            return Err(ValidationError::PlaceholderStatus);
        }

        Ok(())
    }
}
