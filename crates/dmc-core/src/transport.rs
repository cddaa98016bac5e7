//! Transportation mode enum shared across all mode-choice crates.

use std::str::FromStr;

use crate::DmcError;

/// The means by which an agent performs one trip.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[non_exhaustive]
pub enum TransportMode {
    /// Private vehicle, agent is the driver.
    Car,
    /// Private vehicle, agent rides along.
    CarPassenger,
    /// Scheduled public transport (bus, rail, tram…).
    Pt,
    /// Bicycle.
    Bike,
    /// On foot.
    Walk,
}

impl TransportMode {
    /// Every mode the framework knows about, in canonical order.
    pub const ALL: [TransportMode; 5] = [
        TransportMode::Car,
        TransportMode::CarPassenger,
        TransportMode::Pt,
        TransportMode::Bike,
        TransportMode::Walk,
    ];

    /// Label used in configuration files, prompts, and audit output.
    pub fn as_str(self) -> &'static str {
        match self {
            TransportMode::Car          => "car",
            TransportMode::CarPassenger => "car_passenger",
            TransportMode::Pt           => "pt",
            TransportMode::Bike         => "bike",
            TransportMode::Walk         => "walk",
        }
    }

    /// `true` for modes that need a vehicle owned by the agent, which must be
    /// picked up where it was left.
    #[inline]
    pub fn is_private_vehicle(self) -> bool {
        matches!(self, TransportMode::Car | TransportMode::Bike)
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = DmcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_ascii_lowercase();
        TransportMode::ALL
            .into_iter()
            .find(|m| m.as_str() == label)
            .ok_or_else(|| DmcError::UnknownMode(s.to_owned()))
    }
}
