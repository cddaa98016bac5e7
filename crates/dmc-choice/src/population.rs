//! Running many independent tours.

use dmc_agent::Population;
use dmc_behavior::{CandidateEstimator, RecommendationOracle};
use dmc_core::TripCandidate;
use dmc_schedule::Tour;

use crate::{ChoiceError, ChoiceResult, TripBasedModel};

/// Select modes for every tour, looking each tour's agent up in
/// `population`.
///
/// Tours are independent, so with the `parallel` feature they run on
/// Rayon's thread pool.  Results come back in input order either way; one
/// failing tour does not affect the others.
pub fn select_population<O, E>(
    model:      &TripBasedModel<O, E>,
    population: &Population,
    tours:      &mut [Tour],
) -> Vec<ChoiceResult<Vec<TripCandidate>>>
where
    O: RecommendationOracle,
    E: CandidateEstimator,
{
    let run = |tour: &mut Tour| -> ChoiceResult<Vec<TripCandidate>> {
        let agent = population
            .get(tour.agent)
            .ok_or(ChoiceError::UnknownAgent(tour.agent))?;
        model.select_tour(agent, tour)
    };

    #[cfg(not(feature = "parallel"))]
    {
        tours.iter_mut().map(run).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        tours.par_iter_mut().map(run).collect()
    }
}
