//! State of the edit form

use crate::core::facture::Facture;
use crate::core::validation::FactureForm;
use serde::{Deserialize, Serialize};

/// The edit form: inputs, the identifier of the facture being edited, and
/// whether the form is shown
///
/// `id` is the form-scoped identifier; it is empty until a facture has been
/// loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditForm {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub visible: bool,
}

impl EditForm {
    /// The form as the page starts: empty and hidden
    pub fn hidden() -> Self {
        Self::default()
    }

    /// A form as submitted by the browser
    pub fn submitted(
        id: impl Into<String>,
        number: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            number: number.into(),
            status: status.into(),
            visible: true,
        }
    }

    /// Fill the inputs from a facture, remember its identifier and show the form
    pub fn load(&mut self, facture: &Facture) {
        self.id = facture.id.clone();
        self.number = facture.number.clone();
        self.status = facture.status.clone();
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Current input values
    pub fn input(&self) -> FactureForm {
        FactureForm::new(self.number.clone(), self.status.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_shows_form() {
        let mut form = EditForm::hidden();
        form.load(&Facture {
            id: "abc".to_string(),
            number: "INV-1".to_string(),
            status: "Paid".to_string(),
            created_at: None,
        });

        assert_eq!(form, EditForm::submitted("abc", "INV-1", "Paid"));
    }

    #[test]
    fn test_hide_keeps_values() {
        let mut form = EditForm::submitted("abc", "INV-1", "Paid");
        form.hide();

        assert!(!form.visible);
        assert_eq!(form.input(), FactureForm::new("INV-1", "Paid"));
    }
}
