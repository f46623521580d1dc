//! Configuration loading and management

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Connection settings handed to the document database client
///
/// All values are opaque to this crate and passed through as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackendConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub messaging_sender_id: String,
    pub app_id: String,
    pub measurement_id: String,
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Document database client settings
    pub backend: BackendConfig,

    /// Collection holding the factures
    pub collection: String,

    /// Address the page is served on
    pub bind: String,

    /// Status values offered by the selector
    pub statuses: Vec<String>,

    /// Placeholder option of the status selector, rejected on submit
    pub placeholder: String,

    /// chrono format string for the creation date column
    pub date_format: String,

    /// Snapshot buffer per slow listener
    pub event_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig {
                project_id: "demo-factures".to_string(),
                ..BackendConfig::default()
            },
            collection: "factures".to_string(),
            bind: "127.0.0.1:3000".to_string(),
            statuses: vec![
                "Paid".to_string(),
                "Unpaid".to_string(),
                "Pending".to_string(),
            ],
            placeholder: "Choose a status".to_string(),
            date_format: "%d/%m/%Y".to_string(),
            event_capacity: 64,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    ///
    /// Missing keys fall back to [`AppConfig::default`].
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.collection, "factures");
        assert_eq!(config.statuses.len(), 3);
        assert!(!config.statuses.contains(&config.placeholder));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml_str("collection: invoices\n").unwrap();

        assert_eq!(config.collection, "invoices");
        assert_eq!(config.placeholder, "Choose a status");
        assert_eq!(config.backend.project_id, "demo-factures");
    }

    #[test]
    fn test_backend_keys_are_camel_case() {
        let yaml = r#"
backend:
  apiKey: key-123
  projectId: acme
  messagingSenderId: "42"
"#;
        let config = AppConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.backend.api_key, "key-123");
        assert_eq!(config.backend.project_id, "acme");
        assert_eq!(config.backend.messaging_sender_id, "42");
        assert_eq!(config.backend.app_id, "");
    }

    #[test]
    fn test_yaml_serialization() {
        let config = AppConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();

        let parsed = AppConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }
}
