//! The user-supplied mapping file.
//!
//! A mapping file is a small JSON document telling the pipeline which header
//! row to use and which columns carry the record's name and class:
//!
//! ```json
//! {
//!     "header-row-index": 0,
//!     "name-column": "hostname",
//!     "class-column": "env",
//!     "columns": {
//!         "score": { "type": "integer", "null-policy": "fill", "fill-value": "0" },
//!         "owner": { "null-policy": "drop" }
//!     }
//! }
//! ```
//!
//! The optional `columns` table overrides type, null policy and fill value
//! for individual content columns, keyed by header text. Everything not
//! listed there defaults to a string field with the ignore policy.
//!
//! The mapping is immutable once loaded; per-sheet resolution against an
//! actual header row happens in [`crate::schema`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::ConfigResult;

/// The raw, unresolved mapping as the user wrote it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    /// 0-based row treated as the column header.
    #[serde(rename = "header-row-index", default)]
    pub header_row: usize,

    /// Header text identifying the record's name field. Required at
    /// resolution time; keeping it optional here lets loading and
    /// validation report the miss as a configuration error instead of a
    /// serde error.
    #[serde(rename = "name-column", default)]
    pub name_column: Option<String>,

    /// Header text identifying the record's class field.
    #[serde(rename = "class-column", default)]
    pub class_column: Option<String>,

    /// Per-column overrides for content fields, keyed by header text.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub columns: HashMap<String, ColumnSpec>,
}

/// Overrides for a single content column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnSpec {
    /// Value type name (string/integer/float/boolean).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,

    /// Null policy name (abort/drop/ignore/fill).
    #[serde(rename = "null-policy", default, skip_serializing_if = "Option::is_none")]
    pub null_policy: Option<String>,

    /// Fill value, converted to the declared type at resolution time.
    #[serde(rename = "fill-value", default, skip_serializing_if = "Option::is_none")]
    pub fill_value: Option<Value>,
}

impl RawConfig {
    /// A mapping with just a name column, everything else defaulted.
    pub fn new(name_column: impl Into<String>) -> Self {
        Self {
            header_row: 0,
            name_column: Some(name_column.into()),
            class_column: None,
            columns: HashMap::new(),
        }
    }

    pub fn with_class(mut self, class_column: impl Into<String>) -> Self {
        self.class_column = Some(class_column.into());
        self
    }

    pub fn with_header_row(mut self, header_row: usize) -> Self {
        self.header_row = header_row;
        self
    }

    pub fn with_column(mut self, column: impl Into<String>, spec: ColumnSpec) -> Self {
        self.columns.insert(column.into(), spec);
        self
    }

    /// Parse a mapping from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Load a mapping file from disk.
pub fn load_config(path: &Path) -> ConfigResult<RawConfig> {
    let content = fs::read_to_string(path)?;
    let config = RawConfig::from_json(&content)?;
    Ok(config)
}
