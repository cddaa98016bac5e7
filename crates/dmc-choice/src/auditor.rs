//! Audit hook for evaluated and selected candidates.

use std::sync::Arc;

use dmc_core::{AgentId, SelectionId, TripCandidate};

use crate::AuditError;

/// Which of a record's candidates were selected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Selected {
    /// The candidate at this index was chosen for the record's trip.
    Index(usize),
    /// Every candidate is the answer for its trip (whole-tour substitution).
    All,
}

/// One audited decision.
///
/// A trip-level record carries one trip index, every candidate estimated
/// while deciding that trip (rejected ones included, in evaluation order),
/// and [`Selected::Index`] of the one kept.  A tour-level record, written
/// when `IGNORE_AGENT` reverts a tour, carries all trip indices and one
/// candidate per trip, with [`Selected::All`].
#[derive(Clone, Debug)]
pub struct SelectionRecord<'a> {
    pub agent:        AgentId,
    pub trip_indices: &'a [usize],
    pub selection_id: SelectionId,
    pub candidates:   &'a [TripCandidate],
    pub selected:     Selected,
}

impl SelectionRecord<'_> {
    pub fn is_selected(&self, candidate_index: usize) -> bool {
        match self.selected {
            Selected::Index(i) => i == candidate_index,
            Selected::All => candidate_index < self.candidates.len(),
        }
    }

    /// The chosen candidate of a trip-level record.
    pub fn selected_candidate(&self) -> Option<&TripCandidate> {
        match self.selected {
            Selected::Index(i) => self.candidates.get(i),
            Selected::All => None,
        }
    }
}

/// Sink for [`SelectionRecord`]s.
///
/// Shared by all tours of a run, so implementations serialise their own
/// writes.  Errors are reported back to the engine, which logs them and
/// carries on.
pub trait SelectionAuditor: Send + Sync {
    fn record(&self, record: &SelectionRecord<'_>) -> Result<(), AuditError>;
}

impl<T: SelectionAuditor + ?Sized> SelectionAuditor for Box<T> {
    fn record(&self, record: &SelectionRecord<'_>) -> Result<(), AuditError> {
        (**self).record(record)
    }
}

impl<T: SelectionAuditor + ?Sized> SelectionAuditor for Arc<T> {
    fn record(&self, record: &SelectionRecord<'_>) -> Result<(), AuditError> {
        (**self).record(record)
    }
}

/// An auditor that drops every record.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopAuditor;

impl SelectionAuditor for NoopAuditor {
    fn record(&self, _record: &SelectionRecord<'_>) -> Result<(), AuditError> {
        Ok(())
    }
}
