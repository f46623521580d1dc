//! HTML rendering of the facture table and the page around it
//!
//! Both are tera templates compiled once at startup. Rendering is a pure
//! function of its input: the same facture sequence always yields the same
//! bytes, which is what lets the page swap the whole table on every snapshot.

use crate::core::error::FactureError;
use crate::core::facture::Facture;
use crate::core::validation::FactureForm;
use crate::workflows::EditForm;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tera::{Context, Tera};

/// Shown in the date column when a facture has no creation timestamp
pub const DATE_PLACEHOLDER: &str = "Date not available";

const TABLE_TEMPLATE: &str = "table.html";
const PAGE_TEMPLATE: &str = "page.html";

#[derive(Debug, Serialize)]
struct Row<'a> {
    id: &'a str,
    number: &'a str,
    status: &'a str,
    date: String,
}

/// One entry of a status selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusOption {
    pub value: String,
    pub selected: bool,
}

/// Everything the page template needs
#[derive(Debug, Clone, Serialize)]
pub struct PageView<'a> {
    /// Pre-rendered table markup
    pub table: String,
    pub create_form: &'a FactureForm,
    pub create_options: Vec<StatusOption>,
    pub edit_form: &'a EditForm,
    pub edit_options: Vec<StatusOption>,
    /// Blocking alert to raise on load
    pub alert: Option<&'a str>,
}

impl<'a> PageView<'a> {
    pub fn new(
        table: String,
        statuses: &[String],
        placeholder: &str,
        create_form: &'a FactureForm,
        edit_form: &'a EditForm,
        alert: Option<&'a str>,
    ) -> Self {
        Self {
            table,
            create_form,
            create_options: status_options(statuses, placeholder, &create_form.status),
            edit_form,
            edit_options: status_options(statuses, placeholder, &edit_form.status),
            alert,
        }
    }
}

/// Build a status selector: the placeholder first, then the allowed values
///
/// A current value outside the allowed list is kept as an extra option so
/// that editing a facture never silently changes its status.
pub fn status_options(statuses: &[String], placeholder: &str, current: &str) -> Vec<StatusOption> {
    let mut options = Vec::with_capacity(statuses.len() + 2);
    options.push(StatusOption {
        value: placeholder.to_string(),
        selected: current.is_empty() || current == placeholder,
    });

    for status in statuses {
        options.push(StatusOption {
            value: status.clone(),
            selected: status == current,
        });
    }

    if !current.is_empty() && current != placeholder && !statuses.iter().any(|s| s == current) {
        options.push(StatusOption {
            value: current.to_string(),
            selected: true,
        });
    }

    options
}

/// Template-backed renderer
pub struct Renderer {
    tera: Tera,
    date_format: String,
}

impl Renderer {
    /// Compile the templates
    ///
    /// * `date_format` - chrono format string for the creation date
    pub fn new(date_format: impl Into<String>) -> Result<Self, FactureError> {
        let date_format = date_format.into();
        if StrftimeItems::new(&date_format).any(|item| matches!(item, Item::Error)) {
            return Err(FactureError::Config(format!(
                "invalid date format '{}'",
                date_format
            )));
        }

        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (TABLE_TEMPLATE, include_str!("templates/table.html")),
            (PAGE_TEMPLATE, include_str!("templates/page.html")),
        ])
        .map_err(|e| FactureError::Config(format!("invalid template: {}", e)))?;

        Ok(Self { tera, date_format })
    }

    /// Calendar date of a creation timestamp, in local time
    pub fn format_date(&self, created_at: Option<DateTime<Utc>>) -> String {
        match created_at {
            Some(at) => at
                .with_timezone(&Local)
                .format(&self.date_format)
                .to_string(),
            None => DATE_PLACEHOLDER.to_string(),
        }
    }

    /// Render the facture table, one body row per facture in the given order
    pub fn render_table(&self, factures: &[Facture]) -> Result<String, FactureError> {
        let rows: Vec<Row<'_>> = factures
            .iter()
            .map(|facture| Row {
                id: &facture.id,
                number: &facture.number,
                status: &facture.status,
                date: self.format_date(facture.created_at),
            })
            .collect();

        let mut context = Context::new();
        context.insert("rows", &rows);
        self.render(TABLE_TEMPLATE, &context)
    }

    /// Render the full page
    pub fn render_page(&self, view: &PageView<'_>) -> Result<String, FactureError> {
        let context = Context::from_serialize(view)
            .map_err(|e| FactureError::Render(e.to_string()))?;
        self.render(PAGE_TEMPLATE, &context)
    }

    fn render(&self, template: &str, context: &Context) -> Result<String, FactureError> {
        self.tera
            .render(template, context)
            .map_err(|e| FactureError::Render(format!("{}: {}", template, e)))
    }
}
