//! Plain data rows written by the audit sinks.

use dmc_choice::SelectionRecord;
use dmc_core::TransportMode;

/// One evaluated candidate of one audited selection.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRow {
    pub agent_id:     u32,
    /// Trip indices covered by the selection, comma-joined (`"0,1,2"` for a
    /// whole-tour substitution).
    pub trip_indices: String,
    pub selection_id: u64,
    pub mode:         TransportMode,
    pub utility:      f64,
    /// Seconds.
    pub duration:     f64,
    pub selected:     bool,
}

impl AuditRow {
    /// One row per candidate of `record`, in candidate order.
    pub fn from_record(record: &SelectionRecord<'_>) -> Vec<AuditRow> {
        let trip_indices = record
            .trip_indices
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(",");

        record
            .candidates
            .iter()
            .enumerate()
            .map(|(i, c)| AuditRow {
                agent_id:     record.agent.0,
                trip_indices: trip_indices.clone(),
                selection_id: record.selection_id.0,
                mode:         c.mode(),
                utility:      c.utility(),
                duration:     c.duration(),
                selected:     record.is_selected(i),
            })
            .collect()
    }
}
