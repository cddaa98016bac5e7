//! Stock personas for agents without a generated one.

use dmc_core::AgentRng;

/// One-line traveller personas covering the usual urban/rural and
/// lifestyle spread.
pub const STOCK_PERSONAS: &[&str] = &[
    "City-centre student on a tight budget who cycles whenever the weather allows",
    "Suburban nurse on rotating shifts who relies on the regional train",
    "Rural farmer who drives a pickup for almost every errand",
    "Young software developer with a transit pass and no interest in owning a car",
    "Parent of two in a commuter town who chains school runs with the drive to work",
    "Retired nurse in a small town who walks to the shops and takes the bus for longer trips",
    "Sales representative who spends most of the day driving between clients",
    "Environmentally minded architect who bikes in the city and takes trains between cities",
    "Part-time retail worker without a licence who depends on buses and lifts from friends",
    "Senior manager with a company car and reserved parking at the office",
    "Teenager who gets around on foot, by bike, or as a passenger in the family car",
    "Tradesperson carrying tools who needs the van for work trips",
];

/// Draw one stock persona.
pub fn sample(rng: &mut AgentRng) -> &'static str {
    rng.choose(STOCK_PERSONAS).copied().unwrap_or(STOCK_PERSONAS[0])
}
