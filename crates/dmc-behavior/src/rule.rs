//! Deterministic oracle driven by a fixed preference order.

use dmc_agent::AgentProfile;
use dmc_core::{AgentRng, TransportMode};

use crate::{OracleError, OracleResult, RecommendationOracle, TripContext};

/// Proposes the first valid mode of a preference list, after two rules:
///
/// - trips shorter than the walk threshold go on foot when walking is valid;
/// - agents that cannot drive (no licence or no car) never get `car`
///   proposed while another valid mode exists.
///
/// Valid modes missing from the preference list rank after it, in
/// candidate-set order.  No randomness is used.
#[derive(Clone, Debug)]
pub struct RuleBasedOracle {
    preference:        Vec<TransportMode>,
    walk_threshold_km: Option<f64>,
    respect_driving:   bool,
}

impl RuleBasedOracle {
    pub fn new(preference: impl IntoIterator<Item = TransportMode>) -> Self {
        Self {
            preference:        preference.into_iter().collect(),
            walk_threshold_km: None,
            respect_driving:   true,
        }
    }

    /// Propose `walk` for any trip shorter than `km`.
    pub fn walk_below_km(mut self, km: f64) -> Self {
        self.walk_threshold_km = Some(km);
        self
    }

    /// Whether to skip `car` for agents without licence or car (default on).
    pub fn respect_driving_ability(mut self, on: bool) -> Self {
        self.respect_driving = on;
        self
    }
}

impl Default for RuleBasedOracle {
    fn default() -> Self {
        use TransportMode::*;
        RuleBasedOracle::new([Car, Pt, Bike, Walk, CarPassenger]).walk_below_km(1.0)
    }
}

impl RecommendationOracle for RuleBasedOracle {
    fn propose(&self, ctx: &TripContext<'_>, _rng: &mut AgentRng) -> OracleResult<TransportMode> {
        let valid = ctx.valid_modes;
        let first = valid.first().ok_or(OracleError::NoValidModes)?;

        let short = self
            .walk_threshold_km
            .is_some_and(|km| ctx.trip.euclidean_distance_km() < km);
        if short && valid.contains(TransportMode::Walk) {
            return Ok(TransportMode::Walk);
        }

        let car_allowed = !self.respect_driving || AgentProfile::from_agent(ctx.agent).can_drive();
        let admissible = |mode: TransportMode| mode != TransportMode::Car || car_allowed;

        let choice = self
            .preference
            .iter()
            .copied()
            .filter(|&m| valid.contains(m))
            .chain(valid.iter().filter(|m| !self.preference.contains(m)))
            .find(|&m| admissible(m))
            .unwrap_or(first);
        Ok(choice)
    }

    fn name(&self) -> &str {
        "rule_based"
    }
}
