//! In-memory audit sink.

use std::sync::Mutex;

use dmc_choice::{AuditError, SelectionAuditor, SelectionRecord};

use crate::AuditRow;

/// Collects [`AuditRow`]s in memory.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    rows: Mutex<Vec<AuditRow>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every row recorded so far, in arrival order.
    pub fn rows(&self) -> Vec<AuditRow> {
        self.rows.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Only the selected rows.
    pub fn selected(&self) -> Vec<AuditRow> {
        self.rows().into_iter().filter(|r| r.selected).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SelectionAuditor for MemoryAuditSink {
    fn record(&self, record: &SelectionRecord<'_>) -> Result<(), AuditError> {
        self.rows
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .extend(AuditRow::from_record(record));
        Ok(())
    }
}
