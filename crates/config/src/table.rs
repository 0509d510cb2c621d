//! Default event table coordinates

use serde::Deserialize;

/// Event table coordinates used when the command line does not give them
///
/// # Example
///
/// ```toml
/// [table]
/// project = "my-project"
/// dataset = "analytics_123456"
/// table = "events"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableConfig {
    /// Cloud project id
    pub project: Option<String>,

    /// Dataset (analytics property) id
    pub dataset: Option<String>,

    /// Table prefix without the date suffix
    /// Default: "events"
    pub table: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            project: None,
            dataset: None,
            table: "events".to_string(),
        }
    }
}
