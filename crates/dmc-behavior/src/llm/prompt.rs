//! Prompt text for the LLM oracle.
//!
//! Prompts are plain strings with a fixed section order; the model is asked
//! to answer with a single mode label, which
//! [`normalize_response`][crate::normalize_response] then maps back.

use std::fmt::Write;

use dmc_agent::AgentProfile;
use dmc_core::{TransportMode, TripCandidate, format_clock};

use crate::TripContext;

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

fn mode_list(modes: &[TransportMode]) -> String {
    modes.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ")
}

/// System prompt for the mode decision.
pub fn mode_system_prompt(allowed: &[TransportMode]) -> String {
    format!(
        "You simulate the travel behaviour of one person in an agent-based transport model.\n\
         Given a traveller and a trip, answer with the transport mode this person would most \
         likely use.\n\
         \n\
         Take into account:\n\
         - hard requirements: driving needs a licence and a car, walking and cycling need \
         the distance to be reasonable;\n\
         - travel time, cost, comfort and habit, including the modes used earlier today;\n\
         - the persona, which describes attitudes and circumstances.\n\
         \n\
         Answer with exactly one of: {}.\n\
         Do not explain, do not use markdown, reply with the mode label only.",
        mode_list(allowed),
    )
}

/// System prompt for persona generation.
pub fn persona_system_prompt() -> String {
    "You write short traveller personas for an agent-based transport model.\n\
     A persona is one line combining where the person lives, what they do, and \
     one habit or value that shapes how they travel.\n\
     Reply with the persona only, as plain text on a single line."
        .to_owned()
}

/// User prompt asking for a persona matching `profile`.
pub fn persona_prompt(profile: &AgentProfile) -> String {
    let age = profile.age.map_or_else(|| "unknown".to_owned(), |a| a.to_string());
    format!(
        "Traveller attributes:\n\
         - Age: {age} ({group})\n\
         - Gender: {gender}\n\
         - Employed: {employed}\n\
         - Canton of residence: {canton}\n\
         - Municipality type: {municipality}\n\
         - Monthly household income: {income}\n\
         - Driving licence: {license}\n\
         - Car available: {car}\n\
         - Public transport subscription: {pt}\n\
         \n\
         Write a one-line persona for this traveller.",
        group        = profile.age_group,
        gender       = profile.gender,
        employed     = yes_no(profile.employed),
        canton       = profile.canton,
        municipality = profile.municipality_type,
        income       = profile.income,
        license      = yes_no(profile.has_license),
        car          = yes_no(profile.car_available),
        pt           = profile.pt_subscription,
    )
}

/// Summary of the trips already decided in this tour.
pub fn describe_prior_trips(prior: &[TripCandidate]) -> String {
    if prior.is_empty() {
        return "None, this is the first trip of the day.".to_owned();
    }
    let mut out = String::new();
    for (i, candidate) in prior.iter().enumerate() {
        let _ = writeln!(
            out,
            "- trip {}: {} ({:.1} min)",
            i + 1,
            candidate.mode(),
            candidate.duration() / 60.0,
        );
    }
    out
}

/// Estimated door-to-door time for each valid mode.
pub fn describe_options(estimates: &[TripCandidate]) -> String {
    let mut out = String::new();
    for candidate in estimates {
        if candidate.is_feasible() {
            let _ = writeln!(out, "- {}: {:.1} min", candidate.mode(), candidate.duration() / 60.0);
        } else {
            let _ = writeln!(out, "- {}: no estimate", candidate.mode());
        }
    }
    out
}

/// User prompt for one mode decision.
pub fn trip_prompt(
    ctx:       &TripContext<'_>,
    profile:   &AgentProfile,
    persona:   &str,
    estimates: &[TripCandidate],
) -> String {
    let trip = ctx.trip;
    let departure = trip
        .departure_time
        .map_or_else(|| "unknown".to_owned(), format_clock);
    let age = profile.age.map_or_else(|| "unknown".to_owned(), |a| a.to_string());

    format!(
        "Trip\n\
         - From: {origin}\n\
         - To: {destination}\n\
         - Departure: {departure}\n\
         - Straight-line distance: {distance:.2} km\n\
         - Available modes: {modes}\n\
         \n\
         Traveller\n\
         - Age: {age} ({group})\n\
         - Gender: {gender}\n\
         - Canton: {canton}, municipality type: {municipality}\n\
         - Monthly household income: {income}\n\
         - Driving licence: {license}, car available: {car}\n\
         - Public transport subscription: {pt}, employed: {employed}\n\
         - Persona: {persona}\n\
         \n\
         Earlier trips today\n\
         {prior}\n\
         Estimated travel times\n\
         {options}\n\
         Which single mode does this traveller choose?",
        origin       = trip.origin.activity_type,
        destination  = trip.destination.activity_type,
        distance     = trip.euclidean_distance_km(),
        modes        = mode_list(ctx.valid_modes.as_slice()),
        group        = profile.age_group,
        gender       = profile.gender,
        canton       = profile.canton,
        municipality = profile.municipality_type,
        income       = profile.income,
        license      = yes_no(profile.has_license),
        car          = yes_no(profile.car_available),
        pt           = profile.pt_subscription,
        employed     = yes_no(profile.employed),
        prior        = describe_prior_trips(ctx.prior),
        options      = describe_options(estimates),
    )
}
