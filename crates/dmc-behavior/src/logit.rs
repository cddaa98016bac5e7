//! Multinomial logit sampling over estimator utilities.

use dmc_core::{AgentRng, TransportMode};

use crate::{OracleError, OracleResult, RecommendationOracle, TripContext};

/// Samples a mode with probability proportional to `exp(scale * utility)`.
///
/// Utilities come from the tour's estimator.  Infeasible modes (non-finite
/// utility) get probability zero; if every valid mode is infeasible the
/// first valid mode is proposed and the engine's own checks take over.
///
/// A `scale` of zero gives a uniform draw; large scales approach
/// deterministic utility maximisation.
#[derive(Clone, Debug)]
pub struct LogitOracle {
    scale: f64,
}

impl LogitOracle {
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl Default for LogitOracle {
    fn default() -> Self {
        LogitOracle::new(1.0)
    }
}

impl RecommendationOracle for LogitOracle {
    fn propose(&self, ctx: &TripContext<'_>, rng: &mut AgentRng) -> OracleResult<TransportMode> {
        let first = ctx.valid_modes.first().ok_or(OracleError::NoValidModes)?;

        let candidates = ctx.estimate_valid_modes();
        let best = candidates
            .iter()
            .filter(|c| c.is_feasible())
            .map(|c| c.utility())
            .fold(f64::NEG_INFINITY, f64::max);
        if !best.is_finite() {
            return Ok(first);
        }

        // Shift by the maximum so exp() never overflows.
        let weights: Vec<f64> = candidates
            .iter()
            .map(|c| {
                if c.is_feasible() {
                    (self.scale * (c.utility() - best)).exp()
                } else {
                    0.0
                }
            })
            .collect();
        let total: f64 = weights.iter().sum();

        let mut draw = rng.unit() * total;
        for (candidate, weight) in candidates.iter().zip(&weights) {
            if *weight <= 0.0 {
                continue;
            }
            if draw < *weight {
                return Ok(candidate.mode());
            }
            draw -= weight;
        }

        // Floating-point remainder: last mode with positive weight.
        let last = candidates
            .iter()
            .zip(&weights)
            .rev()
            .find(|(_, w)| **w > 0.0)
            .map(|(c, _)| c.mode())
            .unwrap_or(first);
        Ok(last)
    }

    fn name(&self) -> &str {
        "logit"
    }
}
