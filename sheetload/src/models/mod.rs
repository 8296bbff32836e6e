//! Domain models for the sheetload extraction pipeline.
//!
//! This module contains the core data structures used throughout the pipeline:
//!
//! - [`ValueType`] - the semantic type a cell converts to
//! - [`NullPolicy`] - the action taken when a cell has no resolvable value
//! - [`FieldDescriptor`] - one resolved column mapping
//! - [`ResolvedSchema`] - the complete per-sheet field schema
//! - [`CellValue`] - a raw cell as read from the workbook
//! - [`MergedRange`] - a rectangular merged-cell region

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Value Type
// =============================================================================

/// Semantic type a cell value is converted to before serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Stringify the raw value (the default for all resolved fields).
    #[default]
    String,
    /// Parse as a signed integer; non-integral values fail.
    Integer,
    /// Parse as a double-precision float.
    Float,
    /// Parse using a permissive true/false token set.
    Boolean,
}

impl ValueType {
    /// Parse a type name from the mapping file.
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "string" | "str" => Some(Self::String),
            "integer" | "int" => Some(Self::Integer),
            "float" => Some(Self::Float),
            "boolean" | "bool" => Some(Self::Boolean),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Null Policy
// =============================================================================

/// Action taken when a cell resolves to empty (after merged-range lookup).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullPolicy {
    /// Stop processing the whole run immediately.
    Abort,
    /// Discard the current row entirely.
    Drop,
    /// Omit only this field; the row continues.
    Ignore,
    /// Substitute the descriptor's configured fill value.
    Fill,
}

impl NullPolicy {
    /// Parse a policy name from the mapping file.
    ///
    /// Unrecognized text degrades to [`NullPolicy::Drop`], so the policy
    /// engine itself only ever sees the four real policies.
    pub fn parse(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "abort" => Self::Abort,
            "ignore" => Self::Ignore,
            "fill" => Self::Fill,
            _ => Self::Drop,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Abort => "abort",
            Self::Drop => "drop",
            Self::Ignore => "ignore",
            Self::Fill => "fill",
        }
    }
}

// =============================================================================
// Field Descriptor
// =============================================================================

/// One resolved column mapping: where the field lives in the sheet and how
/// its values are converted and null-handled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    /// Header text naming the column.
    pub column: String,
    /// 0-based column index in the sheet.
    pub index: usize,
    /// Declared value type.
    pub value_type: ValueType,
    /// Null-handling policy.
    pub null_policy: NullPolicy,
    /// Typed fill value; present iff `null_policy` is [`NullPolicy::Fill`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_value: Option<Value>,
}

impl FieldDescriptor {
    /// Descriptor with the defaults shared by all resolved fields.
    pub fn new(column: impl Into<String>, index: usize) -> Self {
        Self {
            column: column.into(),
            index,
            value_type: ValueType::String,
            null_policy: NullPolicy::Ignore,
            fill_value: None,
        }
    }

    pub fn with_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    pub fn with_policy(mut self, policy: NullPolicy) -> Self {
        self.null_policy = policy;
        self
    }

    pub fn with_fill(mut self, value: Value) -> Self {
        self.null_policy = NullPolicy::Fill;
        self.fill_value = Some(value);
        self
    }
}

// =============================================================================
// Resolved Schema
// =============================================================================

/// The complete field schema for one sheet.
///
/// Produced once per sheet by [`crate::schema::resolve_schema`] and never
/// mutated afterwards; row extraction only reads it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSchema {
    /// 0-based index of the header row.
    pub header_row: usize,
    /// The record's name field (type string, policy drop).
    pub name: FieldDescriptor,
    /// The record's class field, if mapped (type string, policy ignore).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<FieldDescriptor>,
    /// Content fields in header column order.
    pub content: Vec<FieldDescriptor>,
}

// =============================================================================
// Cell Value
// =============================================================================

/// A raw cell as read from the workbook.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Int(i64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Whether this cell carries no value at all.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// The cell's text form, used for header scanning and string conversion.
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

// =============================================================================
// Merged Range
// =============================================================================

/// A rectangular merged-cell region sharing one anchor value.
///
/// Bounds are inclusive, 0-based sheet coordinates; the anchor is the
/// top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedRange {
    pub row_min: usize,
    pub row_max: usize,
    pub col_min: usize,
    pub col_max: usize,
}

impl MergedRange {
    pub fn new(row_min: usize, row_max: usize, col_min: usize, col_max: usize) -> Self {
        Self {
            row_min,
            row_max,
            col_min,
            col_max,
        }
    }

    /// Whether the region contains the given coordinate.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.row_min && row <= self.row_max && col >= self.col_min && col <= self.col_max
    }

    /// The anchor coordinate holding the group's value.
    pub fn anchor(&self) -> (usize, usize) {
        (self.row_min, self.col_min)
    }
}

// =============================================================================
// Tests
// =============================================================================
