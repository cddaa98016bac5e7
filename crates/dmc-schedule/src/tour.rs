//! A tour: the ordered trips one agent makes in one simulated day.

use dmc_core::{AgentId, TransportMode};

use crate::{Activity, ScheduleError, ScheduleResult, Trip};

/// The trips of one agent's day, in temporal order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tour {
    pub agent: AgentId,
    pub trips: Vec<Trip>,
}

impl Tour {
    pub fn new(agent: AgentId, trips: Vec<Trip>) -> Self {
        Self { agent, trips }
    }

    /// Build the trips connecting consecutive activities.
    ///
    /// `initial_modes[i]` is the baseline mode of the trip from
    /// `activities[i]` to `activities[i + 1]`, so exactly
    /// `activities.len() - 1` modes are required.
    pub fn from_activities(
        agent:         AgentId,
        activities:    Vec<Activity>,
        initial_modes: &[TransportMode],
    ) -> ScheduleResult<Self> {
        if activities.len() < 2 {
            return Err(ScheduleError::TooFewActivities(activities.len()));
        }
        let trip_count = activities.len() - 1;
        if initial_modes.len() != trip_count {
            return Err(ScheduleError::ModeCountMismatch {
                trips: trip_count,
                modes: initial_modes.len(),
            });
        }

        let trips = activities
            .windows(2)
            .zip(initial_modes)
            .enumerate()
            .map(|(i, (pair, &mode))| Trip::new(i, pair[0].clone(), pair[1].clone(), mode))
            .collect();

        Ok(Self { agent, trips })
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Initial modes of all trips, in order.
    pub fn initial_modes(&self) -> Vec<TransportMode> {
        self.trips.iter().map(|t| t.initial_mode).collect()
    }
}
