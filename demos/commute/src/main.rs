//! commute — smallest end-to-end run of the rust_dmc mode-choice engine.
//!
//! Builds a synthetic population of 12 agents living in two neighbourhoods,
//! gives each a home → work → (shop) → home tour, and chooses a mode for
//! every trip with the oracle named in the embedded configuration.  Every
//! evaluated candidate is audited to `output/commute/selections.csv`; mode
//! shares go to `output/commute/summary.json`.
//!
//! Pass a TOML file as the first argument to override the configuration.
//! Set `RUST_LOG=debug` to watch the oracle's proposals.

use std::collections::BTreeMap;
use std::fs::File;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};

use dmc_agent::{AgentBuilder, Population, keys};
use dmc_behavior::{RecommendationOracle, SpeedEstimator};
use dmc_choice::{
    ActivityTypeFilter, CarModeAvailability, CompositeConstraintFactory, MaxDistanceConstraint,
    MaxTravelTimeConstraint, ModeChoiceConfig, TimeWindowConstraint,
    VehicleContinuityConstraintFactory, select_population,
};
use dmc_core::{AgentId, Coord, TransportMode, format_clock};
use dmc_output::CsvAuditSink;
use dmc_schedule::{Activity, Tour};

use TransportMode::*;

// ── Constants ─────────────────────────────────────────────────────────────────

const AGENT_COUNT: u32  = 12;
const OUTPUT_DIR:  &str = "output/commute";

const CONFIG_TOML: &str = r#"
modes = ["car", "car_passenger", "pt", "bike", "walk"]
fallback = "INITIAL_CHOICE"
time_interpretation = "try_end_time_then_duration"
seed = 42

[oracle]
type = "logit"
scale = 1.5
"#;

// ── Synthetic geography ───────────────────────────────────────────────────────

const NORTH_RESIDENTIAL: Coord = Coord { x: 0.0, y: 6_000.0 };
const SOUTH_RESIDENTIAL: Coord = Coord { x: 1_500.0, y: -2_500.0 };
const DOWNTOWN:          Coord = Coord { x: 0.0, y: 0.0 };
const COMMERCE_PARK:     Coord = Coord { x: 9_000.0, y: 500.0 };
const MARKET:            Coord = Coord { x: 800.0, y: 300.0 };

fn build_population() -> Population {
    (0..AGENT_COUNT)
        .map(|i| {
            AgentBuilder::new(AgentId(i))
                .attribute(keys::AGE, 22 + (i as i64 * 7) % 50)
                .attribute(keys::SEX, if i % 2 == 0 { "f" } else { "m" })
                .attribute(keys::INCOME_CLASS, (i as i64 % 5) + 1)
                .attribute(keys::HAS_LICENSE, i % 4 != 3)
                .attribute(keys::CAR_AVAIL, i % 3 != 0)
                .attribute(keys::PT_HAS_HALBTAX, i % 2 == 1)
                .attribute(keys::EMPLOYED, true)
                .attribute(keys::MUNICIPALITY_TYPE, "urban")
                .attribute(keys::CANTON, "Zurich")
                .build()
        })
        .collect()
}

/// Agents 0–5 commute north → downtown, 6–11 south → commerce park.
/// Every third agent stops at the market on the way home.
fn build_tours() -> Result<Vec<Tour>> {
    (0..AGENT_COUNT)
        .map(|i| {
            let (home, work) = if i < AGENT_COUNT / 2 {
                (NORTH_RESIDENTIAL, DOWNTOWN)
            } else {
                (SOUTH_RESIDENTIAL, COMMERCE_PARK)
            };
            let leave = 7.0 * 3600.0 + f64::from(i % 4) * 900.0;

            let mut activities = vec![
                Activity::new("home", home).ending_at(leave),
                Activity::new("work", work).ending_at(leave + 9.0 * 3600.0),
            ];
            let mut modes = vec![Car, Car];
            if i % 3 == 0 {
                activities.push(Activity::new("shop", MARKET).lasting(1_800.0));
                modes.push(Car);
            }
            activities.push(Activity::new("home", home));

            Tour::from_activities(AgentId(i), activities, &modes)
                .with_context(|| format!("building tour of agent {i}"))
        })
        .collect()
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => ModeChoiceConfig::from_path(&path)
            .with_context(|| format!("loading configuration from {path}"))?,
        None => ModeChoiceConfig::from_toml_str(CONFIG_TOML)?,
    };

    println!("=== commute — rust_dmc mode choice ===");
    println!("Agents: {AGENT_COUNT}  |  Seed: {}  |  Fallback: {}", config.seed, config.fallback);
    println!();

    // 1. Population and tours.
    let population = build_population();
    let mut tours = build_tours()?;
    let trip_count: usize = tours.iter().map(Tour::len).sum();
    println!("Tours: {}  |  Trips: {trip_count}", tours.len());

    // 2. Audit sink.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let sink = Arc::new(CsvAuditSink::open(format!("{OUTPUT_DIR}/selections.csv"))?);

    // 3. Model.
    let constraints = CompositeConstraintFactory::new()
        .with_factory(VehicleContinuityConstraintFactory)
        .with_constraint(MaxDistanceConstraint::new().limit(Walk, 4.0).limit(Bike, 15.0))
        .with_constraint(MaxTravelTimeConstraint::new(2.0 * 3600.0))
        .with_constraint(TimeWindowConstraint::new(1_800.0));

    let model = config
        .model_builder(SpeedEstimator::default())?
        .availability(CarModeAvailability::new(config.modes.iter().copied()))
        .constraints(constraints)
        .trip_filter(ActivityTypeFilter::excluding(["outside"]))
        .auditor(Arc::clone(&sink))
        .build()?;
    log::info!("running the {} oracle", model.oracle().name());

    // 4. Run.
    let t0 = Instant::now();
    let results = select_population(&model, &population, &mut tours);
    let elapsed = t0.elapsed();
    sink.close()?;

    // 5. Per-trip table and mode shares.
    println!("Selection complete in {:.3} s", elapsed.as_secs_f64());
    println!();
    println!("{:<8} {:<6} {:<8} {:<14} {:>10}", "Agent", "Trip", "Depart", "Mode", "Minutes");
    println!("{}", "-".repeat(50));

    let mut shares: BTreeMap<String, usize> = BTreeMap::new();
    let mut failed = 0usize;
    for (tour, result) in tours.iter().zip(&results) {
        let chosen = match result {
            Ok(chosen) => chosen,
            Err(err) => {
                eprintln!("{}: {err}", tour.agent);
                failed += 1;
                continue;
            }
        };
        for (trip, candidate) in tour.trips.iter().zip(chosen) {
            *shares.entry(candidate.mode().to_string()).or_default() += 1;
            println!(
                "{:<8} {:<6} {:<8} {:<14} {:>10.1}",
                tour.agent.0,
                trip.index,
                trip.departure_time.map(format_clock).unwrap_or_default(),
                candidate.mode(),
                candidate.duration() / 60.0,
            );
        }
    }
    println!();

    let summary = File::create(format!("{OUTPUT_DIR}/summary.json"))?;
    serde_json::to_writer_pretty(summary, &shares)?;

    println!("Mode shares:");
    for (mode, count) in &shares {
        println!("  {mode:<14} {count}");
    }
    if failed > 0 {
        println!("  ({failed} tours without a feasible choice)");
    }
    println!();
    println!("  {OUTPUT_DIR}/selections.csv");
    println!("  {OUTPUT_DIR}/summary.json");

    Ok(())
}
