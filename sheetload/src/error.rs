//! Error types for the sheetload extraction pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`ConfigError`] - mapping-file and schema-resolution errors
//! - [`WorkbookError`] - workbook open/parse errors
//! - [`ConvertError`] - per-cell type conversion errors
//! - [`UploadError`] - batch delivery errors
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries. Note that cell-level
//! conversion failures never reach [`PipelineError`] directly: they are
//! degraded to the field's null-handling policy inside the extractor.

use thiserror::Error;

use crate::models::ValueType;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading the mapping file or resolving it against a header row.
///
/// All of these are fatal: they surface before any row of the sheet is read.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the mapping file.
    #[error("Failed to read mapping file: {0}")]
    IoError(#[from] std::io::Error),

    /// Mapping file is not valid JSON or has unknown keys.
    #[error("Invalid mapping file: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A required mapping key is absent.
    #[error("Missing required mapping key: {0}")]
    MissingRequiredField(&'static str),

    /// A mapped column does not exist in the sheet's header row.
    #[error("Column '{column}' not found in header row {header_row}")]
    ColumnNotFound { column: String, header_row: usize },

    /// A per-column override names a value type outside string/integer/float/boolean.
    #[error("Unknown value type '{0}', expected string, integer, float or boolean")]
    UnknownValueType(String),

    /// A column declares the fill policy but no fill value.
    #[error("Column '{0}' uses the fill policy but declares no fill-value")]
    MissingFillValue(String),

    /// A declared fill value cannot be converted to the column's value type.
    #[error("Fill value '{value}' for column '{column}' cannot be converted to {value_type}")]
    InvalidFillValue {
        column: String,
        value: String,
        value_type: ValueType,
    },
}

// =============================================================================
// Workbook Errors
// =============================================================================

/// Errors while opening or reading a workbook file.
#[derive(Debug, Error)]
pub enum WorkbookError {
    /// Failed to open the file.
    #[error("Failed to open workbook: {0}")]
    IoError(#[from] std::io::Error),

    /// calamine failed to parse the XLSX archive.
    #[error("Failed to parse workbook: {0}")]
    XlsxError(#[from] calamine::XlsxError),
}

// =============================================================================
// Conversion Errors
// =============================================================================

/// A raw cell value could not be converted to its declared value type.
///
/// These never escalate on their own: the extractor treats a failed
/// conversion as an empty cell and routes it through the field's
/// null-handling policy.
#[derive(Debug, Clone, Error)]
pub enum ConvertError {
    /// Value is not an integer.
    #[error("cannot convert '{value}' to integer")]
    Integer { value: String },

    /// Value is not numeric.
    #[error("cannot convert '{value}' to float")]
    Float { value: String },

    /// Value is not a recognized boolean token.
    #[error("cannot convert '{value}' to boolean")]
    Boolean { value: String },
}

// =============================================================================
// Upload Errors
// =============================================================================

/// Errors while delivering a batch payload to the ingestion sink.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The HTTP request itself failed.
    #[error("Upload request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The sink answered but refused the payload.
    #[error("Sink rejected payload (status {status}): {error}")]
    Rejected { status: u16, error: String },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the main error type returned by [`crate::pipeline::WorkbookWorker`].
/// It wraps all lower-level errors and adds the abort escalation. Any of
/// these ends the whole run; batches flushed before the failure stand.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Mapping or schema-resolution error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Workbook access error.
    #[error("Workbook error: {0}")]
    Workbook(#[from] WorkbookError),

    /// Batch delivery error.
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// A field with the abort policy hit an empty cell.
    #[error("Aborted in sheet '{sheet}' at row {row}: {reason}")]
    Aborted {
        sheet: String,
        row: usize,
        reason: String,
    },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for workbook operations.
pub type WorkbookResult<T> = Result<T, WorkbookError>;

/// Result type for cell conversions.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Result type for upload operations.
pub type UploadResult<T> = Result<T, UploadError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // ConfigError -> PipelineError
        let config_err = ConfigError::MissingRequiredField("name-column");
        let pipeline_err: PipelineError = config_err.into();
        assert!(pipeline_err.to_string().contains("name-column"));

        // UploadError -> PipelineError
        let upload_err = UploadError::Rejected {
            status: 500,
            error: "sink unavailable".into(),
        };
        let pipeline_err: PipelineError = upload_err.into();
        assert!(pipeline_err.to_string().contains("sink unavailable"));
    }

    #[test]
    fn test_column_not_found_format() {
        let err = ConfigError::ColumnNotFound {
            column: "hostname".into(),
            header_row: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("hostname"));
        assert!(msg.contains("row 2"));
    }

    #[test]
    fn test_convert_error_format() {
        let err = ConvertError::Boolean {
            value: "maybe".into(),
        };
        assert!(err.to_string().contains("maybe"));
        assert!(err.to_string().contains("boolean"));
    }

    #[test]
    fn test_aborted_format() {
        let err = PipelineError::Aborted {
            sheet: "hosts".into(),
            row: 7,
            reason: "empty cell in column 'owner'".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("hosts"));
        assert!(msg.contains("row 7"));
        assert!(msg.contains("owner"));
    }

    #[test]
    fn test_io_error_conversion_with_question_mark() {
        fn read_missing() -> ConfigResult<String> {
            let content = std::fs::read_to_string("nonexistent_mapping.json")?;
            Ok(content)
        }

        match read_missing() {
            Err(ConfigError::IoError(_)) => {}
            _ => panic!("Expected IoError from ? operator"),
        }
    }
}
