//! A single movement between two activities.

use dmc_core::TransportMode;

use crate::Activity;

/// One trip of a tour.
///
/// Trips are produced outside the choice engine and are read-only to it,
/// except for [`departure_time`][Self::departure_time], which the engine
/// sets from its running clock before the trip is estimated.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trip {
    /// Position of this trip within its tour, starting at 0.
    pub index:          usize,
    pub origin:         Activity,
    pub destination:    Activity,
    /// The mode of the baseline plan; used by fallback substitution.
    pub initial_mode:   TransportMode,
    /// Seconds since midnight.  `None` until the engine has placed the trip
    /// on the tour clock.
    pub departure_time: Option<f64>,
}

impl Trip {
    pub fn new(
        index:        usize,
        origin:       Activity,
        destination:  Activity,
        initial_mode: TransportMode,
    ) -> Self {
        Self { index, origin, destination, initial_mode, departure_time: None }
    }

    pub fn set_departure_time(&mut self, secs: f64) {
        self.departure_time = Some(secs);
    }

    /// Crow-fly distance between origin and destination, kilometres.
    pub fn euclidean_distance_km(&self) -> f64 {
        self.origin.coord.distance_km(self.destination.coord)
    }
}
