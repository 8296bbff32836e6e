//! Record assembly.
//!
//! Builds one serialized record line per row:
//!
//! ```text
//! <class>,name=<name> message={"field": value, ...}
//! ```
//!
//! The content object keeps header column order, so the same sheet always
//! serializes the same way.

use serde_json::Value;

use crate::api::logs::log_debug;
use crate::extract::{extract_cell, CellOutcome};
use crate::models::ResolvedSchema;
use crate::workbook::Sheet;

/// Outcome of building one row's record.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// The serialized record line.
    Record(String),
    /// The row was discarded.
    Dropped(String),
    /// Processing must stop.
    Aborted(String),
}

/// Extract and serialize one row against a resolved schema.
pub fn build_record(sheet: &Sheet, row: usize, schema: &ResolvedSchema) -> RowOutcome {
    let name = match extract_cell(sheet, row, &schema.name) {
        CellOutcome::Accepted(value) => plain_text(&value),
        CellOutcome::Ignored => String::new(),
        CellOutcome::Dropped(reason) => return RowOutcome::Dropped(reason),
        CellOutcome::Aborted(reason) => return RowOutcome::Aborted(reason),
    };
    if name.is_empty() {
        return RowOutcome::Dropped(format!("empty name in column '{}'", schema.name.column));
    }

    let class = match &schema.class {
        Some(descriptor) => match extract_cell(sheet, row, descriptor) {
            CellOutcome::Accepted(value) => plain_text(&value),
            CellOutcome::Ignored => {
                log_debug(format!("row {row}: no class value, using empty label"));
                String::new()
            }
            CellOutcome::Dropped(reason) => return RowOutcome::Dropped(reason),
            CellOutcome::Aborted(reason) => return RowOutcome::Aborted(reason),
        },
        None => String::new(),
    };

    let mut content: Vec<(&str, Value)> = Vec::with_capacity(schema.content.len());
    for descriptor in &schema.content {
        match extract_cell(sheet, row, descriptor) {
            CellOutcome::Accepted(value) => content.push((descriptor.column.as_str(), value)),
            CellOutcome::Ignored => {
                log_debug(format!(
                    "row {row}: omitting field '{}'",
                    descriptor.column
                ));
            }
            CellOutcome::Dropped(reason) => return RowOutcome::Dropped(reason),
            CellOutcome::Aborted(reason) => return RowOutcome::Aborted(reason),
        }
    }

    RowOutcome::Record(format!(
        "{class},name={name} message={}",
        serialize_content(&content)
    ))
}

/// A converted value's plain text form (no JSON quoting), used for the
/// name and class slots of the record line.
fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Serialize content fields as a JSON object in field order.
///
/// Uses `", "` / `": "` separators so the line format stays stable and
/// readable; keys and values are individually JSON-encoded.
fn serialize_content(fields: &[(&str, Value)]) -> String {
    let mut out = String::from("{");
    for (i, (key, value)) in fields.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&Value::String((*key).to_string()).to_string());
        out.push_str(": ");
        out.push_str(&value.to_string());
    }
    out.push('}');
    out
}
