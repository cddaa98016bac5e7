//! The `RecommendationOracle` trait — the main extension point for user code.

use dmc_core::{AgentRng, TransportMode};

use crate::{OracleResult, TripContext};

/// Proposes one mode for a trip.
///
/// Implement this trait to plug in a mode recommendation source: a fixed
/// rule set, a statistical choice model, a language model, or anything else
/// that maps agent and trip context to a mode.  The choice engine validates
/// whatever comes back, so an oracle does not need to know the constraints.
///
/// # Contract
///
/// - `ctx.valid_modes` is non-empty; an oracle returns
///   [`OracleError::NoValidModes`][crate::OracleError::NoValidModes] if it
///   is called anyway.
/// - On success, the mode is an element of `ctx.valid_modes`.
/// - Any failure (unparsable answer, timeout, transport error) is returned
///   as an [`OracleError`][crate::OracleError]; the engine treats all of
///   them alike.
///
/// # Thread safety
///
/// One oracle serves many tours, possibly in parallel, so implementations
/// must be `Send + Sync`.  Randomness must come from `rng`.
pub trait RecommendationOracle: Send + Sync {
    fn propose(&self, ctx: &TripContext<'_>, rng: &mut AgentRng) -> OracleResult<TransportMode>;

    /// Short identifier for log output.
    fn name(&self) -> &str {
        "oracle"
    }
}

impl<T: RecommendationOracle + ?Sized> RecommendationOracle for Box<T> {
    fn propose(&self, ctx: &TripContext<'_>, rng: &mut AgentRng) -> OracleResult<TransportMode> {
        (**self).propose(ctx, rng)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
