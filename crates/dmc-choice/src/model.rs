//! The `TripBasedModel` and its per-trip selection loop.

use std::sync::atomic::{AtomicU64, Ordering};

use dmc_agent::Agent;
use dmc_behavior::{CandidateEstimator, RecommendationOracle, TripContext};
use dmc_core::{
    AgentRng, SelectionId, TimeInterpretation, TimeTracker, TourModeSet, TransportMode,
    TripCandidate,
};
use dmc_schedule::{Tour, Trip};

use crate::{
    ChoiceError, ChoiceResult, FallbackBehaviour, ModeAvailability, Selected, SelectionAuditor,
    SelectionRecord, TripConstraint, TripConstraintFactory, TripFilter,
};

// ── Per-trip state ────────────────────────────────────────────────────────────

/// Where one trip is in its selection loop.  Logged at `trace`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum TripState {
    Pending,
    AwaitingRecommendation,
    Validating,
    Retry,
    Accepted,
    Exhausted,
}

fn enter(agent: &Agent, trip: &Trip, state: TripState) {
    log::trace!("{} trip {}: {:?}", agent.id, trip.index, state);
}

// ── TripBasedModel ────────────────────────────────────────────────────────────

/// Sequential, time-aware mode selection for one tour at a time.
///
/// For each trip, in order:
///
/// 1. the time tracker passes the origin activity and stamps the trip's
///    departure time;
/// 2. trips rejected by the [`TripFilter`] keep their initial mode;
/// 3. otherwise the oracle is asked for a mode from the trip's own copy of
///    the tour mode set, the proposal is estimated and validated, and a
///    rejected mode is removed from that copy before asking again;
/// 4. when the copy runs empty, or the oracle fails, the
///    [`FallbackBehaviour`] decides;
/// 5. the accepted duration advances the clock.
///
/// One model serves any number of tours, concurrently if need be: the only
/// state shared between calls is the selection-id counter.
///
/// Create via [`TripBasedModelBuilder`][crate::TripBasedModelBuilder].
pub struct TripBasedModel<O, E> {
    pub(crate) oracle:              O,
    pub(crate) estimator:           E,
    pub(crate) availability:        Box<dyn ModeAvailability>,
    pub(crate) constraints:         Box<dyn TripConstraintFactory>,
    pub(crate) filter:              Box<dyn TripFilter>,
    pub(crate) fallback:            FallbackBehaviour,
    pub(crate) time_interpretation: TimeInterpretation,
    pub(crate) auditor:             Box<dyn SelectionAuditor>,
    pub(crate) seed:                u64,
    pub(crate) next_selection:      AtomicU64,
}

impl<O: RecommendationOracle, E: CandidateEstimator> TripBasedModel<O, E> {
    // ── Public API ────────────────────────────────────────────────────────

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    pub fn fallback(&self) -> FallbackBehaviour {
        self.fallback
    }

    /// Choose a mode for every trip of `tour`.
    pub fn select_tour(&self, agent: &Agent, tour: &mut Tour) -> ChoiceResult<Vec<TripCandidate>> {
        self.select(agent, &mut tour.trips)
    }

    /// Choose a mode for every trip in `trips`, in order.
    ///
    /// Sets each trip's departure time.  The result has one candidate per
    /// trip, in trip order.  Fails with
    /// [`ChoiceError::NoFeasibleChoice`] only under
    /// [`FallbackBehaviour::Exception`], and with
    /// [`ChoiceError::EmptyModeSet`] before any trip is processed when the
    /// agent has no modes at all.
    pub fn select(&self, agent: &Agent, trips: &mut [Trip]) -> ChoiceResult<Vec<TripCandidate>> {
        let modes = TourModeSet::new(self.availability.available_modes(agent, trips))
            .map_err(|_| ChoiceError::EmptyModeSet { agent: agent.id })?;
        let constraint = self.constraints.create(agent, trips, &modes);
        let mut rng = AgentRng::new(self.seed, agent.id);
        let mut tracker = TimeTracker::new(self.time_interpretation);
        let mut accepted: Vec<TripCandidate> = Vec::with_capacity(trips.len());

        for i in 0..trips.len() {
            tracker.add_activity(trips[i].origin.timing());
            trips[i].set_departure_time(tracker.time());

            let trip = &trips[i];
            enter(agent, trip, TripState::Pending);
            let mut evaluated = Vec::new();

            let outcome = if self.filter.applies(agent, trip) {
                self.choose_trip(agent, trip, &modes, constraint.as_ref(), &accepted, &mut rng, &mut evaluated)
            } else {
                log::trace!("{} trip {}: filtered, keeping initial mode", agent.id, trip.index);
                let candidate = self.estimate_initial(agent, trip, &accepted);
                evaluated.push(candidate);
                Some(candidate)
            };

            let candidate = match outcome {
                Some(candidate) => candidate,
                None => match self.fallback {
                    FallbackBehaviour::InitialChoice => {
                        log::warn!(
                            "{} trip {}: no feasible choice, falling back to initial mode {}",
                            agent.id, trip.index, trip.initial_mode,
                        );
                        let candidate = self.estimate_initial(agent, trip, &accepted);
                        evaluated.push(candidate);
                        candidate
                    }
                    FallbackBehaviour::IgnoreAgent => {
                        log::warn!(
                            "{} trip {}: no feasible choice, reverting the tour to initial modes",
                            agent.id, trip.index,
                        );
                        return Ok(self.initial_choice_tour(agent, trips));
                    }
                    FallbackBehaviour::Exception => {
                        return Err(ChoiceError::NoFeasibleChoice {
                            agent:      agent.id,
                            trip_index: trip.index,
                        });
                    }
                },
            };

            // The kept candidate is always the last one evaluated.
            self.audit(agent, &[trip.index], &evaluated, Selected::Index(evaluated.len() - 1));

            tracker.add_duration(candidate.duration());
            accepted.push(candidate);
        }

        Ok(accepted)
    }

    // ── Selection loop ────────────────────────────────────────────────────

    /// Retry loop for one trip.  `None` means no feasible choice.
    #[allow(clippy::too_many_arguments)]
    fn choose_trip(
        &self,
        agent:      &Agent,
        trip:       &Trip,
        modes:      &TourModeSet,
        constraint: &dyn TripConstraint,
        prior:      &[TripCandidate],
        rng:        &mut AgentRng,
        evaluated:  &mut Vec<TripCandidate>,
    ) -> Option<TripCandidate> {
        let prior_modes: Vec<TransportMode> = prior.iter().map(TripCandidate::mode).collect();
        let mut valid = modes.candidates();

        while !valid.is_empty() {
            valid.retain(|m| constraint.validate_before_estimation(trip, m, &prior_modes));
            if valid.is_empty() {
                break;
            }

            enter(agent, trip, TripState::AwaitingRecommendation);
            let ctx = TripContext::new(agent, trip, &valid, prior, &self.estimator);
            let mode = match self.oracle.propose(&ctx, rng) {
                Ok(mode) if valid.contains(mode) => mode,
                Ok(mode) => {
                    log::warn!(
                        "{} trip {}: {} proposed {} outside {:?}",
                        agent.id, trip.index, self.oracle.name(), mode, valid.as_slice(),
                    );
                    enter(agent, trip, TripState::Exhausted);
                    return None;
                }
                Err(err) => {
                    log::warn!(
                        "{} trip {}: {} failed: {}",
                        agent.id, trip.index, self.oracle.name(), err,
                    );
                    enter(agent, trip, TripState::Exhausted);
                    return None;
                }
            };
            log::debug!("{} trip {}: {} proposed {}", agent.id, trip.index, self.oracle.name(), mode);

            enter(agent, trip, TripState::Validating);
            let candidate = self.estimator.estimate(agent, mode, trip, prior);
            evaluated.push(candidate);

            if !candidate.is_feasible() {
                log::warn!(
                    "{} trip {}: illegal utility {} for {}",
                    agent.id, trip.index, candidate.utility(), mode,
                );
                valid.remove(mode);
                enter(agent, trip, TripState::Retry);
                continue;
            }
            if !constraint.validate_after_estimation(trip, &candidate, prior) {
                valid.remove(mode);
                enter(agent, trip, TripState::Retry);
                continue;
            }

            enter(agent, trip, TripState::Accepted);
            return Some(candidate);
        }

        enter(agent, trip, TripState::Exhausted);
        None
    }

    fn estimate_initial(&self, agent: &Agent, trip: &Trip, prior: &[TripCandidate]) -> TripCandidate {
        self.estimator.estimate(agent, trip.initial_mode, trip, prior)
    }

    /// Rebuild the whole tour from initial modes on a fresh clock.
    fn initial_choice_tour(&self, agent: &Agent, trips: &mut [Trip]) -> Vec<TripCandidate> {
        let mut tracker = TimeTracker::new(self.time_interpretation);
        let mut candidates: Vec<TripCandidate> = Vec::with_capacity(trips.len());

        for trip in trips.iter_mut() {
            tracker.add_activity(trip.origin.timing());
            trip.set_departure_time(tracker.time());
            let candidate = self.estimate_initial(agent, trip, &candidates);
            tracker.add_duration(candidate.duration());
            candidates.push(candidate);
        }

        let indices: Vec<usize> = trips.iter().map(|t| t.index).collect();
        self.audit(agent, &indices, &candidates, Selected::All);
        candidates
    }

    // ── Auditing ──────────────────────────────────────────────────────────

    fn audit(&self, agent: &Agent, trip_indices: &[usize], candidates: &[TripCandidate], selected: Selected) {
        let selection_id = SelectionId(self.next_selection.fetch_add(1, Ordering::Relaxed));
        let record = SelectionRecord {
            agent: agent.id,
            trip_indices,
            selection_id,
            candidates,
            selected,
        };
        if let Err(err) = self.auditor.record(&record) {
            log::warn!("{}: could not record selection {}: {}", agent.id, selection_id.0, err);
        }
    }
}
