//! Pipeline orchestration.
//!
//! [`WorkbookWorker`] iterates a workbook's sheets in native order, skips
//! the empty ones, resolves the mapping against each sheet's own header and
//! hands the sheet to a [`SheetWorker`]. The sheet worker drives the
//! per-row loop and owns its batcher plus a fresh uploader handle, so no
//! state is shared across sheets.
//!
//! Execution is strictly sequential: a batch flush completes before the
//! next row is extracted, and a sheet finishes before the next one starts.
//! Dropped rows and ignored fields are recovered here and never escalate;
//! an abort or a configuration error ends the whole run.

use serde::Serialize;
use std::path::Path;

use crate::api::logs::{log_debug, log_error, log_info, log_success, log_warning};
use crate::batch::{RecordBatcher, DEFAULT_BATCH_SIZE};
use crate::config::RawConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::extract::record::{build_record, RowOutcome};
use crate::models::ResolvedSchema;
use crate::schema::resolve_schema;
use crate::upload::Uploader;
use crate::workbook::{open_workbook_file, Sheet};

/// Options for a pipeline run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Records per delivered batch.
    pub batch_size: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Per-sheet processing statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SheetSummary {
    pub sheet: String,
    pub rows_seen: usize,
    pub records_emitted: usize,
    pub rows_dropped: usize,
    pub batches_sent: usize,
}

/// Whole-run statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub sheets: Vec<SheetSummary>,
    pub sheets_skipped: usize,
}

impl RunSummary {
    pub fn records_emitted(&self) -> usize {
        self.sheets.iter().map(|s| s.records_emitted).sum()
    }

    pub fn rows_dropped(&self) -> usize {
        self.sheets.iter().map(|s| s.rows_dropped).sum()
    }

    pub fn batches_sent(&self) -> usize {
        self.sheets.iter().map(|s| s.batches_sent).sum()
    }
}

// =============================================================================
// Sheet worker
// =============================================================================

/// Processes the data rows of one sheet against its resolved schema.
pub struct SheetWorker<U: Uploader> {
    schema: ResolvedSchema,
    batcher: RecordBatcher<U>,
}

impl<U: Uploader> SheetWorker<U> {
    pub fn new(schema: ResolvedSchema, uploader: U, batch_size: usize) -> Self {
        Self {
            schema,
            batcher: RecordBatcher::with_capacity(uploader, batch_size),
        }
    }

    /// Run the row loop to completion, then flush the partial tail batch.
    pub async fn run(mut self, sheet: &Sheet) -> PipelineResult<SheetSummary> {
        let mut summary = SheetSummary {
            sheet: sheet.name().to_string(),
            ..SheetSummary::default()
        };

        for row in self.schema.header_row + 1..sheet.row_count() {
            summary.rows_seen += 1;
            match build_record(sheet, row, &self.schema) {
                RowOutcome::Record(line) => {
                    self.batcher.add(line).await?;
                    summary.records_emitted += 1;
                }
                RowOutcome::Dropped(reason) => {
                    log_warning(format!(
                        "dropping row {} in sheet '{}': {}",
                        row,
                        sheet.name(),
                        reason
                    ));
                    summary.rows_dropped += 1;
                }
                RowOutcome::Aborted(reason) => {
                    log_error(format!(
                        "aborting at row {} in sheet '{}': {}",
                        row,
                        sheet.name(),
                        reason
                    ));
                    return Err(PipelineError::Aborted {
                        sheet: sheet.name().to_string(),
                        row,
                        reason,
                    });
                }
            }
        }

        self.batcher.flush().await?;
        summary.batches_sent = self.batcher.batches_sent();
        Ok(summary)
    }
}

// =============================================================================
// Workbook worker
// =============================================================================

/// Drives a whole workbook through the pipeline.
pub struct WorkbookWorker<U: Uploader + Clone> {
    config: RawConfig,
    uploader: U,
    options: RunOptions,
}

impl<U: Uploader + Clone> WorkbookWorker<U> {
    pub fn new(config: RawConfig, uploader: U, options: RunOptions) -> Self {
        Self {
            config,
            uploader,
            options,
        }
    }

    /// Open the workbook file and process every sheet.
    ///
    /// The file handle is released as soon as the sheets are materialized,
    /// before any upload happens.
    pub async fn run(&self, path: &Path) -> PipelineResult<RunSummary> {
        log_info(format!("reading workbook {}", path.display()));
        let sheets = open_workbook_file(path)?;
        self.run_sheets(&sheets).await
    }

    /// Process already-materialized sheets in order.
    pub async fn run_sheets(&self, sheets: &[Sheet]) -> PipelineResult<RunSummary> {
        let mut run = RunSummary::default();

        for sheet in sheets {
            if sheet.row_count() == 0 || sheet.column_count() == 0 {
                log_debug(format!("skipping empty sheet '{}'", sheet.name()));
                run.sheets_skipped += 1;
                continue;
            }

            let header = sheet.row(self.config.header_row).unwrap_or(&[]);
            let schema = resolve_schema(&self.config, header)?;
            log_info(format!(
                "processing sheet '{}' ({} rows, {} content fields)",
                sheet.name(),
                sheet.row_count(),
                schema.content.len()
            ));

            let worker = SheetWorker::new(schema, self.uploader.clone(), self.options.batch_size);
            let summary = worker.run(sheet).await?;
            log_success(format!(
                "sheet '{}': {} records in {} batches, {} rows dropped",
                summary.sheet, summary.records_emitted, summary.batches_sent, summary.rows_dropped
            ));
            run.sheets.push(summary);
        }

        Ok(run)
    }
}
