//! The facture record and its document representation
//!
//! The backend stores schemaless documents: an opaque identifier plus a map
//! of named fields. A [`Facture`] is the typed view of one such document in
//! the `factures` collection.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Field map of a stored document
pub type Fields = Map<String, Value>;

/// Field name of the invoice label
pub const FIELD_NUMBER: &str = "number";

/// Field name of the invoice status
pub const FIELD_STATUS: &str = "status";

/// Field name of the creation timestamp
pub const FIELD_CREATED_AT: &str = "createdAt";

/// A stored document, tagged with the identifier assigned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// An invoice record
///
/// `id` and `created_at` are fixed once the record exists; only `number`
/// and `status` are ever rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facture {
    pub id: String,

    #[serde(default)]
    pub number: String,

    #[serde(default)]
    pub status: String,

    #[serde(
        rename = "createdAt",
        default,
        deserialize_with = "lenient_created_at",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

/// Read `createdAt`, treating a value that is not an RFC 3339 timestamp as absent
fn lenient_created_at<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(
        |raw| match serde_json::from_value::<DateTime<Utc>>(raw.clone()) {
            Ok(at) => Some(at),
            Err(err) => {
                tracing::warn!(created_at = %raw, error = %err, "ignoring unreadable creation date");
                None
            }
        },
    ))
}

impl Facture {
    /// Decode a document into a facture
    ///
    /// The document identifier always wins over an `id` field stored in the
    /// document body.
    pub fn from_document(document: &Document) -> Result<Self> {
        let mut fields = document.fields.clone();
        fields.insert("id".to_string(), Value::String(document.id.clone()));

        serde_json::from_value(Value::Object(fields))
            .with_context(|| format!("document '{}' is not a facture", document.id))
    }

    /// Fields written by the create workflow
    pub fn creation_fields(number: &str, status: &str, created_at: DateTime<Utc>) -> Fields {
        let mut fields = Self::edit_fields(number, status);
        fields.insert(
            FIELD_CREATED_AT.to_string(),
            Value::String(created_at.to_rfc3339()),
        );
        fields
    }

    /// Partial fields written by the edit workflow
    ///
    /// Never contains `createdAt` or `id`.
    pub fn edit_fields(number: &str, status: &str) -> Fields {
        let mut fields = Fields::new();
        fields.insert(FIELD_NUMBER.to_string(), Value::String(number.to_string()));
        fields.insert(FIELD_STATUS.to_string(), Value::String(status.to_string()));
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_from_document_full() {
        let doc = Document::new(
            "abc",
            fields(json!({
                "number": "INV-1",
                "status": "Paid",
                "createdAt": "2024-03-01T10:00:00Z"
            })),
        );

        let facture = Facture::from_document(&doc).unwrap();
        assert_eq!(facture.id, "abc");
        assert_eq!(facture.number, "INV-1");
        assert_eq!(facture.status, "Paid");
        assert_eq!(
            facture.created_at,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_from_document_without_date() {
        let doc = Document::new("abc", fields(json!({"number": "INV-2", "status": "Unpaid"})));

        let facture = Facture::from_document(&doc).unwrap();
        assert!(facture.created_at.is_none());
    }

    #[test]
    fn test_from_document_with_unreadable_date() {
        for created_at in [json!("yesterday"), json!(1700000000), json!(null)] {
            let doc = Document::new(
                "abc",
                fields(json!({"number": "INV-4", "status": "Paid", "createdAt": created_at})),
            );

            let facture = Facture::from_document(&doc).unwrap();
            assert_eq!(facture.number, "INV-4");
            assert!(facture.created_at.is_none());
        }
    }

    #[test]
    fn test_document_id_overrides_body_id() {
        let doc = Document::new(
            "real",
            fields(json!({"id": "spoofed", "number": "INV-3", "status": "Paid"})),
        );

        assert_eq!(Facture::from_document(&doc).unwrap().id, "real");
    }

    #[test]
    fn test_from_document_rejects_wrong_types() {
        let doc = Document::new("abc", fields(json!({"number": 42, "status": "Paid"})));

        let err = Facture::from_document(&doc).unwrap_err();
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_edit_fields_only_touch_number_and_status() {
        let patch = Facture::edit_fields("INV-1", "Unpaid");

        assert_eq!(patch.len(), 2);
        assert!(!patch.contains_key(FIELD_CREATED_AT));
        assert!(!patch.contains_key("id"));
    }

    #[test]
    fn test_creation_fields_carry_timestamp() {
        let now = Utc::now();
        let created = Facture::creation_fields("INV-1", "Paid", now);

        assert_eq!(created[FIELD_CREATED_AT], json!(now.to_rfc3339()));
    }
}
