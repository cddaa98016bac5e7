//! Feasibility rules checked before and after candidate estimation.
//!
//! A [`TripConstraintFactory`] creates one [`TripConstraint`] per tour, so a
//! rule may hold tour-level state (where the car is parked, say).  Rules
//! combine conjunctively through [`CompositeConstraint`], evaluated in
//! insertion order.

use std::collections::HashMap;

use dmc_agent::Agent;
use dmc_core::{Coord, TourModeSet, TransportMode, TripCandidate};
use dmc_schedule::Trip;

// ── Traits ────────────────────────────────────────────────────────────────────

/// Two-phase feasibility check for a proposed mode.
///
/// Both methods default to "accept" so a rule only overrides the phase it
/// cares about.
pub trait TripConstraint {
    /// Estimator-independent check.  `previous_modes` are the modes of the
    /// accepted trips before `trip`, in order.
    fn validate_before_estimation(
        &self,
        _trip:           &Trip,
        _mode:           TransportMode,
        _previous_modes: &[TransportMode],
    ) -> bool {
        true
    }

    /// Check on the estimated candidate.  `previous` are the accepted
    /// candidates before `trip`, in order.
    fn validate_after_estimation(
        &self,
        _trip:      &Trip,
        _candidate: &TripCandidate,
        _previous:  &[TripCandidate],
    ) -> bool {
        true
    }
}

/// Creates the constraint for one tour.
pub trait TripConstraintFactory: Send + Sync {
    fn create(&self, agent: &Agent, trips: &[Trip], modes: &TourModeSet) -> Box<dyn TripConstraint>;
}

impl<T: TripConstraintFactory + ?Sized> TripConstraintFactory for Box<T> {
    fn create(&self, agent: &Agent, trips: &[Trip], modes: &TourModeSet) -> Box<dyn TripConstraint> {
        (**self).create(agent, trips, modes)
    }
}

// ── Composite ─────────────────────────────────────────────────────────────────

/// Conjunction of constraints.  Empty accepts everything.
#[derive(Default)]
pub struct CompositeConstraint {
    constraints: Vec<Box<dyn TripConstraint>>,
}

impl CompositeConstraint {
    pub fn new(constraints: Vec<Box<dyn TripConstraint>>) -> Self {
        Self { constraints }
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

impl TripConstraint for CompositeConstraint {
    fn validate_before_estimation(
        &self,
        trip:           &Trip,
        mode:           TransportMode,
        previous_modes: &[TransportMode],
    ) -> bool {
        self.constraints
            .iter()
            .all(|c| c.validate_before_estimation(trip, mode, previous_modes))
    }

    fn validate_after_estimation(
        &self,
        trip:      &Trip,
        candidate: &TripCandidate,
        previous:  &[TripCandidate],
    ) -> bool {
        self.constraints
            .iter()
            .all(|c| c.validate_after_estimation(trip, candidate, previous))
    }
}

/// Builds a [`CompositeConstraint`] per tour from its sub-factories.
///
/// ```rust,ignore
/// let factory = CompositeConstraintFactory::new()
///     .with_factory(VehicleContinuityConstraintFactory)
///     .with_constraint(MaxTravelTimeConstraint::new(7_200.0));
/// ```
#[derive(Default)]
pub struct CompositeConstraintFactory {
    factories: Vec<Box<dyn TripConstraintFactory>>,
}

impl CompositeConstraintFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a factory for a stateful, per-tour rule.
    pub fn with_factory(mut self, factory: impl TripConstraintFactory + 'static) -> Self {
        self.factories.push(Box::new(factory));
        self
    }

    /// Add a stateless rule; every tour gets a clone.
    pub fn with_constraint<C>(mut self, constraint: C) -> Self
    where
        C: TripConstraint + Clone + Send + Sync + 'static,
    {
        self.factories.push(Box::new(CloneFactory(constraint)));
        self
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl TripConstraintFactory for CompositeConstraintFactory {
    fn create(&self, agent: &Agent, trips: &[Trip], modes: &TourModeSet) -> Box<dyn TripConstraint> {
        let constraints = self
            .factories
            .iter()
            .map(|f| f.create(agent, trips, modes))
            .collect();
        Box::new(CompositeConstraint::new(constraints))
    }
}

struct CloneFactory<C>(C);

impl<C> TripConstraintFactory for CloneFactory<C>
where
    C: TripConstraint + Clone + Send + Sync + 'static,
{
    fn create(&self, _agent: &Agent, _trips: &[Trip], _modes: &TourModeSet) -> Box<dyn TripConstraint> {
        Box::new(self.0.clone())
    }
}

// ── MaxDistanceConstraint ─────────────────────────────────────────────────────

/// Pre-estimation: a mode is inapplicable above a crow-fly distance.
///
/// Modes without a limit are unrestricted.
#[derive(Clone, Debug, Default)]
pub struct MaxDistanceConstraint {
    limits_km: HashMap<TransportMode, f64>,
}

impl MaxDistanceConstraint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, mode: TransportMode, km: f64) -> Self {
        self.limits_km.insert(mode, km);
        self
    }
}

impl TripConstraint for MaxDistanceConstraint {
    fn validate_before_estimation(
        &self,
        trip:            &Trip,
        mode:            TransportMode,
        _previous_modes: &[TransportMode],
    ) -> bool {
        match self.limits_km.get(&mode) {
            Some(&km) => trip.euclidean_distance_km() <= km,
            None => true,
        }
    }
}

// ── VehicleContinuityConstraint ───────────────────────────────────────────────

/// Positions closer than this are the same place, metres.
const SAME_PLACE_M: f64 = 1.0;

/// Pre-estimation, tour-level chaining: a private vehicle (car, bike) can
/// only be taken from where it currently is.
///
/// Every vehicle starts at the origin of the first trip and moves to the
/// destination of each trip that uses it.  Non-vehicle modes are always
/// allowed.
#[derive(Clone, Debug)]
pub struct VehicleContinuityConstraint {
    tour_start:   Coord,
    destinations: Vec<Coord>,
}

impl VehicleContinuityConstraint {
    pub fn for_trips(trips: &[Trip]) -> Self {
        Self {
            tour_start:   trips.first().map(|t| t.origin.coord).unwrap_or_default(),
            destinations: trips.iter().map(|t| t.destination.coord).collect(),
        }
    }

    /// Where `mode`'s vehicle is after the trips in `previous_modes`.
    fn vehicle_location(&self, mode: TransportMode, previous_modes: &[TransportMode]) -> Coord {
        previous_modes
            .iter()
            .zip(&self.destinations)
            .filter(|(m, _)| **m == mode)
            .map(|(_, dest)| *dest)
            .last()
            .unwrap_or(self.tour_start)
    }
}

impl TripConstraint for VehicleContinuityConstraint {
    fn validate_before_estimation(
        &self,
        trip:           &Trip,
        mode:           TransportMode,
        previous_modes: &[TransportMode],
    ) -> bool {
        if !mode.is_private_vehicle() {
            return true;
        }
        let location = self.vehicle_location(mode, previous_modes);
        location.distance_m(trip.origin.coord) <= SAME_PLACE_M
    }
}

/// Creates a [`VehicleContinuityConstraint`] for each tour.
#[derive(Copy, Clone, Debug, Default)]
pub struct VehicleContinuityConstraintFactory;

impl TripConstraintFactory for VehicleContinuityConstraintFactory {
    fn create(&self, _agent: &Agent, trips: &[Trip], _modes: &TourModeSet) -> Box<dyn TripConstraint> {
        Box::new(VehicleContinuityConstraint::for_trips(trips))
    }
}

// ── MaxTravelTimeConstraint ───────────────────────────────────────────────────

/// Post-estimation: travel duration limit, optionally per mode.
#[derive(Clone, Debug)]
pub struct MaxTravelTimeConstraint {
    default_secs: f64,
    per_mode:     HashMap<TransportMode, f64>,
}

impl MaxTravelTimeConstraint {
    /// Limit every mode to `default_secs`.
    pub fn new(default_secs: f64) -> Self {
        Self { default_secs, per_mode: HashMap::new() }
    }

    /// Override the limit for one mode.
    pub fn limit(mut self, mode: TransportMode, secs: f64) -> Self {
        self.per_mode.insert(mode, secs);
        self
    }
}

impl TripConstraint for MaxTravelTimeConstraint {
    fn validate_after_estimation(
        &self,
        _trip:     &Trip,
        candidate: &TripCandidate,
        _previous: &[TripCandidate],
    ) -> bool {
        let limit = self
            .per_mode
            .get(&candidate.mode())
            .copied()
            .unwrap_or(self.default_secs);
        candidate.duration() <= limit
    }
}

// ── TimeWindowConstraint ──────────────────────────────────────────────────────

/// Post-estimation: arrival must not be later than the end time of the
/// destination activity plus `slack_secs`.
///
/// Trips without a departure time or whose destination has no end time
/// pass.
#[derive(Clone, Debug, Default)]
pub struct TimeWindowConstraint {
    slack_secs: f64,
}

impl TimeWindowConstraint {
    pub fn new(slack_secs: f64) -> Self {
        Self { slack_secs }
    }
}

impl TripConstraint for TimeWindowConstraint {
    fn validate_after_estimation(
        &self,
        trip:      &Trip,
        candidate: &TripCandidate,
        _previous: &[TripCandidate],
    ) -> bool {
        match (trip.departure_time, trip.destination.end_time) {
            (Some(departure), Some(end)) => departure + candidate.duration() <= end + self.slack_secs,
            _ => true,
        }
    }
}
