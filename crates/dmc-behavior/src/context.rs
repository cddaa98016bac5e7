//! Read-only trip state passed to every oracle call.

use dmc_agent::Agent;
use dmc_core::{CandidateModeSet, TripCandidate};
use dmc_schedule::Trip;

use crate::CandidateEstimator;

/// Everything a [`RecommendationOracle`][crate::RecommendationOracle] may
/// consult for one proposal.
///
/// Built by the choice engine for each oracle call.  `valid_modes` is the
/// trip's current candidate set, already narrowed by constraints and earlier
/// rejections, and is never empty.
///
/// # Lifetimes
///
/// All borrows live for the duration of one proposal.
pub struct TripContext<'a> {
    pub agent: &'a Agent,

    /// The trip being decided; its departure time is already set.
    pub trip: &'a Trip,

    /// Modes the oracle may propose.  A proposal outside this set is
    /// treated as a failed recommendation.
    pub valid_modes: &'a CandidateModeSet,

    /// Accepted candidates of trips `0..trip.index`, in order.
    pub prior: &'a [TripCandidate],

    /// The tour's estimator, for oracles that weigh utilities or quote
    /// travel times.
    pub estimator: &'a dyn CandidateEstimator,
}

impl<'a> TripContext<'a> {
    #[inline]
    pub fn new(
        agent:       &'a Agent,
        trip:        &'a Trip,
        valid_modes: &'a CandidateModeSet,
        prior:       &'a [TripCandidate],
        estimator:   &'a dyn CandidateEstimator,
    ) -> Self {
        Self { agent, trip, valid_modes, prior, estimator }
    }

    /// Estimate every valid mode for this trip, in candidate-set order.
    pub fn estimate_valid_modes(&self) -> Vec<TripCandidate> {
        self.valid_modes
            .iter()
            .map(|mode| self.estimator.estimate(self.agent, mode, self.trip, self.prior))
            .collect()
    }
}
