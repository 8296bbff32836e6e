//! Cell extraction: direct lookup, merged-range fallback, type conversion
//! and null-policy routing.
//!
//! The abort/drop/ignore outcomes are plain returned values, not errors:
//! every caller has to branch on [`CellOutcome`] explicitly, so no control
//! flow hides in unwinding.

pub mod convert;
pub mod merge;
pub mod record;

use serde_json::Value;

use crate::models::{FieldDescriptor, NullPolicy};
use crate::workbook::Sheet;

/// Outcome of extracting one field from one row.
#[derive(Debug, Clone, PartialEq)]
pub enum CellOutcome {
    /// The field converted successfully (or was filled).
    Accepted(Value),
    /// Omit only this field; the row continues.
    Ignored,
    /// Discard the whole row.
    Dropped(String),
    /// Stop the whole run.
    Aborted(String),
}

/// Route an empty cell through the field's null-handling policy.
///
/// `reason` describes why the cell counts as empty (truly blank, or a
/// failed conversion) and ends up in the drop/abort report.
pub fn apply_null_policy(descriptor: &FieldDescriptor, reason: &str) -> CellOutcome {
    match descriptor.null_policy {
        NullPolicy::Abort => CellOutcome::Aborted(format!(
            "{reason} in column '{}' under abort policy",
            descriptor.column
        )),
        NullPolicy::Drop => {
            CellOutcome::Dropped(format!("{reason} in column '{}'", descriptor.column))
        }
        NullPolicy::Ignore => CellOutcome::Ignored,
        NullPolicy::Fill => match &descriptor.fill_value {
            Some(value) => CellOutcome::Accepted(value.clone()),
            // Schema resolution guarantees a fill value; a descriptor built
            // without one degrades to drop rather than emitting null.
            None => CellOutcome::Dropped(format!(
                "fill policy without fill value in column '{}'",
                descriptor.column
            )),
        },
    }
}

/// Extract one field from one row of a sheet.
///
/// Lookup order: the direct cell at the descriptor's column index, then the
/// merged-range anchor, then the null policy. A value that fails type
/// conversion is treated as empty and routed through the same policy.
pub fn extract_cell(sheet: &Sheet, row: usize, descriptor: &FieldDescriptor) -> CellOutcome {
    let direct = sheet.cell(row, descriptor.index);
    let resolved = if direct.is_empty() {
        merge::resolve_merged(sheet, row, descriptor.index)
    } else {
        Some(direct)
    };

    match resolved {
        Some(cell) => match convert::convert_cell(cell, descriptor.value_type) {
            Ok(value) => CellOutcome::Accepted(value),
            Err(err) => apply_null_policy(descriptor, &err.to_string()),
        },
        None => apply_null_policy(descriptor, "empty cell"),
    }
}
