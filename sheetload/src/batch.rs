//! Record batching.
//!
//! Serialized records accumulate in an ordered buffer; reaching the
//! configured capacity flushes them to the uploader as one newline-joined
//! payload, and the sheet worker flushes once more at end of sheet for the
//! partial tail. A flush blocks until the uploader's send completes, so
//! batches never overlap.

use crate::api::logs::log_debug;
use crate::error::UploadResult;
use crate::upload::Uploader;

/// Default number of records per batch.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Accumulates record lines and flushes them in bounded batches.
pub struct RecordBatcher<U: Uploader> {
    uploader: U,
    capacity: usize,
    buffer: Vec<String>,
    batches_sent: usize,
    records_sent: usize,
}

impl<U: Uploader> RecordBatcher<U> {
    pub fn new(uploader: U) -> Self {
        Self::with_capacity(uploader, DEFAULT_BATCH_SIZE)
    }

    pub fn with_capacity(uploader: U, capacity: usize) -> Self {
        Self {
            uploader,
            capacity: capacity.max(1),
            buffer: Vec::new(),
            batches_sent: 0,
            records_sent: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Batches delivered so far.
    pub fn batches_sent(&self) -> usize {
        self.batches_sent
    }

    /// Records delivered so far (excludes anything still buffered).
    pub fn records_sent(&self) -> usize {
        self.records_sent
    }

    /// Append one record; a full buffer flushes before this returns.
    pub async fn add(&mut self, record: String) -> UploadResult<()> {
        self.buffer.push(record);
        if self.buffer.len() >= self.capacity {
            self.flush().await?;
        }
        Ok(())
    }

    /// Deliver everything buffered as one payload. Empty buffer is a no-op.
    ///
    /// On delivery failure the buffer is kept intact and the error
    /// propagates; this component never retries.
    pub async fn flush(&mut self) -> UploadResult<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let payload = self.buffer.join("\n");
        log_debug(format!("flushing batch of {} records", self.buffer.len()));
        self.uploader.send(&payload).await?;
        self.batches_sent += 1;
        self.records_sent += self.buffer.len();
        self.buffer.clear();
        Ok(())
    }
}
