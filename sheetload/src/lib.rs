//! # Sheetload - workbook object extraction and batched upload
//!
//! Sheetload reads spreadsheet workbooks, maps columns to a declarative
//! field schema, converts and null-handles cell values, and delivers the
//! resulting object records to an ingestion sink in bounded batches.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Workbook   │────▶│   Schema    │────▶│   Extract   │────▶│   Batches   │
//! │   (XLSX)    │     │ (mapping ×  │     │ (merge/type │     │ (uploaded   │
//! │             │     │   header)   │     │  /null ops) │     │  10 a time) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sheetload::{load_config, HttpUploader, RunOptions, WorkbookWorker};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = load_config(Path::new("mapping.json")).unwrap();
//!     let uploader = HttpUploader::new("http://localhost:9529/api/write");
//!     let worker = WorkbookWorker::new(config, uploader, RunOptions::default());
//!     let summary = worker.run(Path::new("hosts.xlsx")).await.unwrap();
//!     println!("uploaded {} records", summary.records_emitted());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (schemas, cells, policies)
//! - [`config`] - The user mapping file
//! - [`schema`] - Mapping-vs-header resolution
//! - [`workbook`] - XLSX access via calamine
//! - [`extract`] - Cell extraction, conversion, record assembly
//! - [`batch`] - Record batching
//! - [`upload`] - Delivery to the ingestion sink
//! - [`pipeline`] - Sheet and workbook orchestration
//! - [`api`] - Echo sink service and log streaming

// Core modules
pub mod error;
pub mod models;

// Configuration
pub mod config;
pub mod schema;

// Workbook access
pub mod workbook;

// Extraction
pub mod extract;

// Delivery
pub mod batch;
pub mod upload;

// Orchestration
pub mod pipeline;

// HTTP surface
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError, ConvertError, PipelineError, UploadError, WorkbookError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    CellValue, FieldDescriptor, MergedRange, NullPolicy, ResolvedSchema, ValueType,
};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{load_config, ColumnSpec, RawConfig};
pub use schema::resolve_schema;

// =============================================================================
// Re-exports - Workbook
// =============================================================================

pub use workbook::{open_workbook_file, Sheet};

// =============================================================================
// Re-exports - Extraction
// =============================================================================

pub use extract::convert::convert_cell;
pub use extract::merge::resolve_merged;
pub use extract::record::{build_record, RowOutcome};
pub use extract::{apply_null_policy, extract_cell, CellOutcome};

// =============================================================================
// Re-exports - Delivery
// =============================================================================

pub use batch::{RecordBatcher, DEFAULT_BATCH_SIZE};
pub use upload::{HttpUploader, LogUploader, SinkResponse, Uploader};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{RunOptions, RunSummary, SheetSummary, SheetWorker, WorkbookWorker};

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
