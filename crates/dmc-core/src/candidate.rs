//! The result of estimating one trip under one mode.

use crate::TransportMode;

/// One evaluated option for a trip: a (mode, utility, duration) triple.
///
/// A non-finite utility is the estimator's way of saying "this mode cannot be
/// used for this trip"; the choice engine treats such candidates as rejected.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "CandidateFields"))]
pub struct TripCandidate {
    mode:     TransportMode,
    utility:  f64,
    duration: f64,
}

impl TripCandidate {
    /// Create a candidate.  Negative or NaN durations are stored as 0.
    pub fn new(mode: TransportMode, utility: f64, duration: f64) -> Self {
        let duration = if duration.is_nan() { 0.0 } else { duration.max(0.0) };
        Self { mode, utility, duration }
    }

    /// A candidate marking `mode` as unusable.
    pub fn infeasible(mode: TransportMode) -> Self {
        Self { mode, utility: f64::NEG_INFINITY, duration: 0.0 }
    }

    #[inline]
    pub fn mode(&self) -> TransportMode {
        self.mode
    }

    #[inline]
    pub fn utility(&self) -> f64 {
        self.utility
    }

    /// Travel duration in seconds, always `>= 0`.
    #[inline]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// `true` when the estimator produced a finite utility.
    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.utility.is_finite()
    }
}

/// Deserialisation goes through [`TripCandidate::new`] so the duration
/// clamp holds for candidates read from files too.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct CandidateFields {
    mode:     TransportMode,
    utility:  f64,
    duration: f64,
}

#[cfg(feature = "serde")]
impl From<CandidateFields> for TripCandidate {
    fn from(fields: CandidateFields) -> Self {
        TripCandidate::new(fields.mode, fields.utility, fields.duration)
    }
}
