//! Which trips go through mode selection at all.

use dmc_agent::Agent;
use dmc_schedule::Trip;

/// Decides whether a trip is subject to selection.
///
/// Trips for which `applies` is `false` keep their initial mode: the engine
/// estimates it and records it without asking the oracle or applying the
/// fallback policy.
pub trait TripFilter: Send + Sync {
    fn applies(&self, agent: &Agent, trip: &Trip) -> bool;
}

impl<T: TripFilter + ?Sized> TripFilter for Box<T> {
    fn applies(&self, agent: &Agent, trip: &Trip) -> bool {
        (**self).applies(agent, trip)
    }
}

/// Every trip is selected.
#[derive(Copy, Clone, Debug, Default)]
pub struct AllTrips;

impl TripFilter for AllTrips {
    fn applies(&self, _agent: &Agent, _trip: &Trip) -> bool {
        true
    }
}

/// Conjunction of filters.  Empty accepts every trip.
#[derive(Default)]
pub struct CompositeTripFilter {
    filters: Vec<Box<dyn TripFilter>>,
}

impl CompositeTripFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: impl TripFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }
}

impl TripFilter for CompositeTripFilter {
    fn applies(&self, agent: &Agent, trip: &Trip) -> bool {
        self.filters.iter().all(|f| f.applies(agent, trip))
    }
}

/// Excludes trips that start or end at one of the listed activity types.
#[derive(Clone, Debug, Default)]
pub struct ActivityTypeFilter {
    excluded: Vec<String>,
}

impl ActivityTypeFilter {
    pub fn excluding<S: Into<String>>(types: impl IntoIterator<Item = S>) -> Self {
        Self { excluded: types.into_iter().map(Into::into).collect() }
    }
}

impl TripFilter for ActivityTypeFilter {
    fn applies(&self, _agent: &Agent, trip: &Trip) -> bool {
        !self.excluded.iter().any(|t| {
            *t == trip.origin.activity_type || *t == trip.destination.activity_type
        })
    }
}
