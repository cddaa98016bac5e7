//! `dmc-choice` — the trip-sequence mode selection engine.
//!
//! # Per-trip loop
//!
//! ```text
//! for trip in tour (in order):
//!   clock.add_activity(origin); trip.departure = clock.time()
//!   if !filter.applies(trip)       → keep initial mode
//!   valid = tour_modes.candidates()          (fresh copy per trip)
//!   loop:
//!     ① drop modes failing validate_before_estimation
//!     ② valid empty                → EXHAUSTED
//!     ③ oracle.propose(valid)      → error: EXHAUSTED (no retry)
//!     ④ estimate(mode)             → non-finite utility: remove, retry
//!     ⑤ validate_after_estimation  → rejected: remove, retry
//!     ⑥ ACCEPTED
//!   EXHAUSTED → fallback: INITIAL_CHOICE | IGNORE_AGENT | EXCEPTION
//!   clock.add_duration(chosen.duration)
//! ```
//!
//! # Crate layout
//!
//! | Module           | Contents                                                  |
//! |------------------|-----------------------------------------------------------|
//! | [`model`]        | `TripBasedModel<O, E>` — the loop above                   |
//! | [`builder`]      | `TripBasedModelBuilder<O, E>`                             |
//! | [`availability`] | `ModeAvailability`, default and car-aware variants        |
//! | [`constraint`]   | `TripConstraint`, factories, composite, concrete rules    |
//! | [`filter`]       | `TripFilter`, `AllTrips`, composite, activity-type filter |
//! | [`fallback`]     | `FallbackBehaviour`                                       |
//! | [`auditor`]      | `SelectionAuditor`, `SelectionRecord`, `NoopAuditor`      |
//! | [`config`]       | `ModeChoiceConfig`, `OracleConfig` (TOML)                 |
//! | [`population`]   | `select_population` over many tours                       |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | `select_population` runs tours on Rayon's thread pool.  |
//! | `llm`      | `OracleConfig::Llm` builds an Ollama-backed oracle.     |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use dmc_behavior::{RuleBasedOracle, SpeedEstimator};
//! use dmc_choice::{FallbackBehaviour, TripBasedModelBuilder};
//!
//! let model = TripBasedModelBuilder::new(RuleBasedOracle::default(), SpeedEstimator::default())
//!     .fallback(FallbackBehaviour::InitialChoice)
//!     .seed(42)
//!     .build()?;
//! let chosen = model.select_tour(&agent, &mut tour)?;
//! ```

pub mod auditor;
pub mod availability;
pub mod builder;
pub mod config;
pub mod constraint;
pub mod error;
pub mod fallback;
pub mod filter;
pub mod model;
pub mod population;

#[cfg(test)]
mod tests;

pub use auditor::{NoopAuditor, Selected, SelectionAuditor, SelectionRecord};
pub use availability::{CarModeAvailability, DefaultModeAvailability, ModeAvailability};
pub use builder::TripBasedModelBuilder;
pub use config::{ModeChoiceConfig, OracleConfig};
pub use constraint::{
    CompositeConstraint, CompositeConstraintFactory, MaxDistanceConstraint,
    MaxTravelTimeConstraint, TimeWindowConstraint, TripConstraint, TripConstraintFactory,
    VehicleContinuityConstraint, VehicleContinuityConstraintFactory,
};
pub use error::{AuditError, ChoiceError, ChoiceResult};
pub use fallback::FallbackBehaviour;
pub use filter::{ActivityTypeFilter, AllTrips, CompositeTripFilter, TripFilter};
pub use model::TripBasedModel;
pub use population::select_population;
