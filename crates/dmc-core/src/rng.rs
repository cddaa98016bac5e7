//! Per-agent random streams.
//!
//! The choice engine opens one [`AgentRng`] per tour, keyed by the run seed
//! and the agent id.  Stochastic oracles (logit sampling, persona draws)
//! take every random number from it, so the outcome of a tour does not
//! depend on which worker thread ran it or on how many tours ran before.
//!
//! Seeds are mixed with the 64-bit golden-ratio constant so adjacent agent
//! ids land far apart in seed space.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::AgentId;

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// Random stream for one agent's tour.  Not shared between threads.
pub struct AgentRng(SmallRng);

impl AgentRng {
    pub fn new(run_seed: u64, agent: AgentId) -> Self {
        let seed = run_seed ^ u64::from(agent.0).wrapping_mul(GOLDEN_GAMMA);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// Uniform draw in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }

    /// Uniform pick from `items`; `None` when empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.0)
    }

    /// The underlying generator, for `rand` distributions.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }
}
