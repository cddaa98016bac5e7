//! Mode sets at tour and trip scope.
//!
//! A [`TourModeSet`] is fixed for the whole tour and cannot be modified.
//! Each trip derives its own [`CandidateModeSet`] via
//! [`TourModeSet::candidates`] and narrows that copy while it retries, so a
//! mode rejected for one trip is still offered to the next.

use crate::{DmcError, DmcResult, TransportMode};

// ── TourModeSet ───────────────────────────────────────────────────────────────

/// The modes available to one agent for one tour.
///
/// Non-empty, free of duplicates, and in the order the modes were supplied
/// (the order oracles see them in).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TourModeSet {
    modes: Vec<TransportMode>,
}

impl TourModeSet {
    /// Build a tour mode set, dropping repeated modes.
    ///
    /// Fails with [`DmcError::EmptyModeSet`] when `modes` yields nothing.
    pub fn new(modes: impl IntoIterator<Item = TransportMode>) -> DmcResult<Self> {
        let mut unique: Vec<TransportMode> = Vec::new();
        for mode in modes {
            if !unique.contains(&mode) {
                unique.push(mode);
            }
        }
        if unique.is_empty() {
            return Err(DmcError::EmptyModeSet);
        }
        Ok(Self { modes: unique })
    }

    /// A fresh, trip-scoped working copy.
    pub fn candidates(&self) -> CandidateModeSet {
        CandidateModeSet { modes: self.modes.clone() }
    }

    pub fn contains(&self, mode: TransportMode) -> bool {
        self.modes.contains(&mode)
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn as_slice(&self) -> &[TransportMode] {
        &self.modes
    }

    pub fn iter(&self) -> impl Iterator<Item = TransportMode> + '_ {
        self.modes.iter().copied()
    }
}

// ── CandidateModeSet ──────────────────────────────────────────────────────────

/// The modes still open for one trip's selection attempt.
///
/// Only removal is possible: there is no way to put a mode back once it has
/// been excluded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateModeSet {
    modes: Vec<TransportMode>,
}

impl CandidateModeSet {
    /// Keep only the modes for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(TransportMode) -> bool) {
        self.modes.retain(|&m| keep(m));
    }

    /// Remove `mode`.  Returns `true` if it was present.
    pub fn remove(&mut self, mode: TransportMode) -> bool {
        let before = self.modes.len();
        self.modes.retain(|&m| m != mode);
        self.modes.len() != before
    }

    pub fn contains(&self, mode: TransportMode) -> bool {
        self.modes.contains(&mode)
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn first(&self) -> Option<TransportMode> {
        self.modes.first().copied()
    }

    pub fn as_slice(&self) -> &[TransportMode] {
        &self.modes
    }

    pub fn iter(&self) -> impl Iterator<Item = TransportMode> + '_ {
        self.modes.iter().copied()
    }
}
