//! CSV audit backend.
//!
//! ```text
//! agent_id;trip_indices;selection_id;mode;utility;duration;selected
//! 17;0;42;car;-1.000000;120;false
//! 17;0;42;pt;-2.000000;600;true
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use csv::{Writer, WriterBuilder};
use dmc_choice::{AuditError, SelectionAuditor, SelectionRecord};

use crate::{AuditRow, OutputError, OutputResult};

pub const CSV_HEADER: [&str; 7] = [
    "agent_id",
    "trip_indices",
    "selection_id",
    "mode",
    "utility",
    "duration",
    "selected",
];

/// Thread-safe CSV audit sink.
///
/// Explicitly opened, explicitly closed: [`close`][Self::close] flushes and
/// drops the writer, and any record after that fails with
/// [`OutputError::Closed`].  Dropping an open sink flushes as well, but
/// errors are then lost.
pub struct CsvAuditSink<W: Write = File> {
    writer: Mutex<Option<Writer<W>>>,
}

impl CsvAuditSink<File> {
    /// Create (or truncate) the file at `path` and write the header row.
    pub fn open(path: impl AsRef<Path>) -> OutputResult<Self> {
        Self::from_writer(File::create(path)?)
    }
}

impl<W: Write> CsvAuditSink<W> {
    /// Wrap any writer and write the header row.
    pub fn from_writer(inner: W) -> OutputResult<Self> {
        let mut writer = WriterBuilder::new().delimiter(b';').from_writer(inner);
        writer.write_record(CSV_HEADER)?;
        writer.flush()?;
        Ok(Self { writer: Mutex::new(Some(writer)) })
    }

    fn lock(&self) -> MutexGuard<'_, Option<Writer<W>>> {
        self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append every candidate of `record` and flush.
    pub fn write(&self, record: &SelectionRecord<'_>) -> OutputResult<()> {
        let mut guard = self.lock();
        let writer = guard.as_mut().ok_or(OutputError::Closed)?;
        for row in AuditRow::from_record(record) {
            writer.write_record(&[
                row.agent_id.to_string(),
                row.trip_indices,
                row.selection_id.to_string(),
                row.mode.to_string(),
                format!("{:.6}", row.utility),
                row.duration.to_string(),
                row.selected.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Flush and release the writer.  Idempotent.
    pub fn close(&self) -> OutputResult<()> {
        match self.lock().take() {
            Some(mut writer) => Ok(writer.flush()?),
            None => Ok(()),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.lock().is_none()
    }
}

impl<W: Write + Send> SelectionAuditor for CsvAuditSink<W> {
    fn record(&self, record: &SelectionRecord<'_>) -> Result<(), AuditError> {
        self.write(record).map_err(AuditError::new)
    }
}
