//! The `CandidateEstimator` trait and two reference estimators.

use std::collections::HashMap;

use dmc_agent::Agent;
use dmc_core::{TransportMode, TripCandidate};
use dmc_schedule::Trip;

/// Pluggable utility and duration estimation for one trip under one mode.
///
/// Implementations may do routing or cost lookups, but must be pure with
/// respect to the choice engine: the same inputs give the same candidate.
/// `prior` holds the accepted candidates of the earlier trips of the tour,
/// in order.
///
/// A mode that cannot be used is signalled by a candidate with a non-finite
/// utility (see [`TripCandidate::infeasible`]), never by panicking.
pub trait CandidateEstimator: Send + Sync {
    fn estimate(
        &self,
        agent: &Agent,
        mode:  TransportMode,
        trip:  &Trip,
        prior: &[TripCandidate],
    ) -> TripCandidate;
}

impl<T: CandidateEstimator + ?Sized> CandidateEstimator for Box<T> {
    fn estimate(
        &self,
        agent: &Agent,
        mode:  TransportMode,
        trip:  &Trip,
        prior: &[TripCandidate],
    ) -> TripCandidate {
        (**self).estimate(agent, mode, trip, prior)
    }
}

// ── ConstantEstimator ─────────────────────────────────────────────────────────

/// Fixed utility and duration per mode, independent of the trip.
///
/// Modes without an entry are infeasible.  Mostly useful in tests.
#[derive(Clone, Debug, Default)]
pub struct ConstantEstimator {
    alternatives: HashMap<TransportMode, (f64, f64)>,
}

impl ConstantEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `mode` with the given utility and duration (seconds).
    pub fn with_alternative(mut self, mode: TransportMode, utility: f64, duration: f64) -> Self {
        self.alternatives.insert(mode, (utility, duration));
        self
    }
}

impl CandidateEstimator for ConstantEstimator {
    fn estimate(
        &self,
        _agent: &Agent,
        mode:   TransportMode,
        _trip:  &Trip,
        _prior: &[TripCandidate],
    ) -> TripCandidate {
        match self.alternatives.get(&mode) {
            Some(&(utility, duration)) => TripCandidate::new(mode, utility, duration),
            None => TripCandidate::infeasible(mode),
        }
    }
}

// ── SpeedEstimator ────────────────────────────────────────────────────────────

/// Teleportation parameters for one mode.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ModeSpeed {
    /// Average door-to-door speed on the network distance, km/h.
    pub speed_kmh:     f64,
    /// Fixed access / egress / waiting time added to every trip, seconds.
    pub access_secs:   f64,
    /// Alternative-specific constant.
    pub constant:      f64,
}

/// Crow-fly teleportation: network distance is the Euclidean distance times
/// a detour factor, duration follows from a per-mode speed, and utility is
/// an alternative-specific constant minus value of time.
///
/// ```text
/// duration = dist_km * detour / speed_kmh * 3600 + access_secs
/// utility  = constant - value_of_time * duration_h
/// ```
#[derive(Clone, Debug)]
pub struct SpeedEstimator {
    modes:         HashMap<TransportMode, ModeSpeed>,
    detour_factor: f64,
    /// Utility units per hour of travel.
    value_of_time: f64,
}

impl SpeedEstimator {
    pub fn new(detour_factor: f64, value_of_time: f64) -> Self {
        Self { modes: HashMap::new(), detour_factor, value_of_time }
    }

    pub fn with_mode(mut self, mode: TransportMode, params: ModeSpeed) -> Self {
        self.modes.insert(mode, params);
        self
    }
}

impl Default for SpeedEstimator {
    /// Typical urban values for all five modes.
    fn default() -> Self {
        let mode = |speed_kmh, access_secs, constant| ModeSpeed { speed_kmh, access_secs, constant };
        SpeedEstimator::new(1.3, 2.0)
            .with_mode(TransportMode::Car,          mode(35.0, 300.0,  0.0))
            .with_mode(TransportMode::CarPassenger, mode(35.0, 300.0, -0.6))
            .with_mode(TransportMode::Pt,           mode(22.0, 420.0, -0.3))
            .with_mode(TransportMode::Bike,         mode(15.0,  60.0, -0.2))
            .with_mode(TransportMode::Walk,         mode( 4.8,   0.0,  0.1))
    }
}

impl CandidateEstimator for SpeedEstimator {
    fn estimate(
        &self,
        _agent: &Agent,
        mode:   TransportMode,
        trip:   &Trip,
        _prior: &[TripCandidate],
    ) -> TripCandidate {
        let Some(params) = self.modes.get(&mode) else {
            return TripCandidate::infeasible(mode);
        };
        if params.speed_kmh <= 0.0 {
            return TripCandidate::infeasible(mode);
        }

        let network_km = trip.euclidean_distance_km() * self.detour_factor;
        let duration = network_km / params.speed_kmh * 3_600.0 + params.access_secs;
        let utility = params.constant - self.value_of_time * duration / 3_600.0;
        TripCandidate::new(mode, utility, duration)
    }
}
