//! Which modes an agent may use for a whole tour.

use dmc_agent::{Agent, AgentProfile};
use dmc_core::TransportMode;
use dmc_schedule::Trip;

/// Produces the tour-level mode list for one agent.
///
/// The engine turns the result into a `TourModeSet`; an empty list makes
/// the tour fail with `ChoiceError::EmptyModeSet` before any trip is
/// processed.
pub trait ModeAvailability: Send + Sync {
    fn available_modes(&self, agent: &Agent, trips: &[Trip]) -> Vec<TransportMode>;
}

impl<T: ModeAvailability + ?Sized> ModeAvailability for Box<T> {
    fn available_modes(&self, agent: &Agent, trips: &[Trip]) -> Vec<TransportMode> {
        (**self).available_modes(agent, trips)
    }
}

/// The same fixed list for everybody.
#[derive(Clone, Debug)]
pub struct DefaultModeAvailability {
    modes: Vec<TransportMode>,
}

impl DefaultModeAvailability {
    pub fn new(modes: impl IntoIterator<Item = TransportMode>) -> Self {
        Self { modes: modes.into_iter().collect() }
    }
}

impl Default for DefaultModeAvailability {
    fn default() -> Self {
        Self::new(TransportMode::ALL)
    }
}

impl ModeAvailability for DefaultModeAvailability {
    fn available_modes(&self, _agent: &Agent, _trips: &[Trip]) -> Vec<TransportMode> {
        self.modes.clone()
    }
}

/// A fixed list minus `car` for agents without a licence or without a car.
#[derive(Clone, Debug)]
pub struct CarModeAvailability {
    modes: Vec<TransportMode>,
}

impl CarModeAvailability {
    pub fn new(modes: impl IntoIterator<Item = TransportMode>) -> Self {
        Self { modes: modes.into_iter().collect() }
    }
}

impl ModeAvailability for CarModeAvailability {
    fn available_modes(&self, agent: &Agent, _trips: &[Trip]) -> Vec<TransportMode> {
        let can_drive = AgentProfile::from_agent(agent).can_drive();
        self.modes
            .iter()
            .copied()
            .filter(|&m| can_drive || m != TransportMode::Car)
            .collect()
    }
}
