//! Fluent builder for constructing a [`TripBasedModel`].

use std::sync::atomic::AtomicU64;

use dmc_behavior::{CandidateEstimator, RecommendationOracle};
use dmc_core::{TimeInterpretation, TourModeSet, TransportMode};

use crate::{
    AllTrips, ChoiceError, ChoiceResult, CompositeConstraintFactory, DefaultModeAvailability,
    FallbackBehaviour, ModeAvailability, NoopAuditor, SelectionAuditor, TripBasedModel,
    TripConstraintFactory, TripFilter,
};

/// Fluent builder for [`TripBasedModel<O, E>`].
///
/// # Required inputs
///
/// - `O: RecommendationOracle`: proposes modes
/// - `E: CandidateEstimator`: estimates utility and duration
///
/// # Optional inputs (have defaults)
///
/// | Method                     | Default                                  |
/// |----------------------------|------------------------------------------|
/// | `.modes(m)`                | all modes, via `DefaultModeAvailability` |
/// | `.availability(a)`         | as above                                 |
/// | `.constraints(f)`          | empty `CompositeConstraintFactory`       |
/// | `.trip_filter(f)`          | `AllTrips`                               |
/// | `.fallback(b)`             | `FallbackBehaviour::Exception`           |
/// | `.time_interpretation(t)`  | `TryEndTimeThenDuration`                 |
/// | `.auditor(a)`              | `NoopAuditor`                            |
/// | `.seed(s)`                 | `0`                                      |
///
/// # Example
///
/// ```rust,ignore
/// let model = TripBasedModelBuilder::new(RuleBasedOracle::default(), SpeedEstimator::default())
///     .modes([Car, Pt, Walk])
///     .fallback(FallbackBehaviour::InitialChoice)
///     .build()?;
/// let chosen = model.select_tour(&agent, &mut tour)?;
/// ```
pub struct TripBasedModelBuilder<O, E> {
    oracle:              O,
    estimator:           E,
    modes:               Option<Vec<TransportMode>>,
    availability:        Option<Box<dyn ModeAvailability>>,
    constraints:         Option<Box<dyn TripConstraintFactory>>,
    filter:              Option<Box<dyn TripFilter>>,
    fallback:            FallbackBehaviour,
    time_interpretation: TimeInterpretation,
    auditor:             Option<Box<dyn SelectionAuditor>>,
    seed:                u64,
}

impl<O: RecommendationOracle, E: CandidateEstimator> TripBasedModelBuilder<O, E> {
    /// Create a builder with all required inputs.
    pub fn new(oracle: O, estimator: E) -> Self {
        Self {
            oracle,
            estimator,
            modes:               None,
            availability:        None,
            constraints:         None,
            filter:              None,
            fallback:            FallbackBehaviour::default(),
            time_interpretation: TimeInterpretation::default(),
            auditor:             None,
            seed:                0,
        }
    }

    /// The same mode list for every agent.
    ///
    /// Ignored when [`availability`][Self::availability] is also given.
    pub fn modes(mut self, modes: impl IntoIterator<Item = TransportMode>) -> Self {
        self.modes = Some(modes.into_iter().collect());
        self
    }

    /// Per-agent mode availability.
    pub fn availability(mut self, availability: impl ModeAvailability + 'static) -> Self {
        self.availability = Some(Box::new(availability));
        self
    }

    pub fn constraints(mut self, factory: impl TripConstraintFactory + 'static) -> Self {
        self.constraints = Some(Box::new(factory));
        self
    }

    pub fn trip_filter(mut self, filter: impl TripFilter + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    pub fn fallback(mut self, fallback: FallbackBehaviour) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn time_interpretation(mut self, interpretation: TimeInterpretation) -> Self {
        self.time_interpretation = interpretation;
        self
    }

    pub fn auditor(mut self, auditor: impl SelectionAuditor + 'static) -> Self {
        self.auditor = Some(Box::new(auditor));
        self
    }

    /// Global seed; each tour's RNG is derived from it and the agent id.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate inputs and return a ready-to-use [`TripBasedModel`].
    pub fn build(self) -> ChoiceResult<TripBasedModel<O, E>> {
        let availability: Box<dyn ModeAvailability> = match (self.availability, self.modes) {
            (Some(a), _) => a,
            (None, Some(modes)) => {
                // Reject an empty list now rather than on the first tour.
                TourModeSet::new(modes.iter().copied())
                    .map_err(|e| ChoiceError::Config(e.to_string()))?;
                Box::new(DefaultModeAvailability::new(modes))
            }
            (None, None) => Box::new(DefaultModeAvailability::default()),
        };

        Ok(TripBasedModel {
            oracle:              self.oracle,
            estimator:           self.estimator,
            availability,
            constraints:         self
                .constraints
                .unwrap_or_else(|| Box::new(CompositeConstraintFactory::new())),
            filter:              self.filter.unwrap_or_else(|| Box::new(AllTrips)),
            fallback:            self.fallback,
            time_interpretation: self.time_interpretation,
            auditor:             self.auditor.unwrap_or_else(|| Box::new(NoopAuditor)),
            seed:                self.seed,
            next_selection:      AtomicU64::new(0),
        })
    }
}
