//! Unit and scenario tests for dmc-choice.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use dmc_agent::{Agent, AgentBuilder, Population, keys};
use dmc_behavior::{ConstantEstimator, OracleError, OracleResult, RecommendationOracle, TripContext};
use dmc_core::{AgentId, AgentRng, Coord, TourModeSet, TransportMode, TripCandidate};
use dmc_schedule::{Activity, Tour, Trip};

use crate::{
    AuditError, ChoiceError, FallbackBehaviour, Selected, SelectionAuditor, SelectionRecord,
    TripBasedModelBuilder, TripConstraint,
};

use TransportMode::*;

// ── Helpers ───────────────────────────────────────────────────────────────────

const ALL_FOUR: [TransportMode; 4] = [Car, Pt, Walk, Bike];

fn agent(id: u32) -> Agent {
    AgentBuilder::new(AgentId(id))
        .attribute(keys::HAS_LICENSE, true)
        .attribute(keys::CAR_AVAIL, true)
        .build()
}

fn home() -> Activity {
    Activity::new("home", Coord::new(0.0, 0.0))
}

fn work() -> Activity {
    Activity::new("work", Coord::new(3_000.0, 4_000.0))
}

fn shop() -> Activity {
    Activity::new("shop", Coord::new(3_000.0, 0.0))
}

/// home(→08:00) → work, initial mode walk.
fn single_trip() -> Vec<Trip> {
    vec![Trip::new(0, home().ending_at(8.0 * 3600.0), work(), Walk)]
}

/// home(→08:00) → work(→17:00) → home, initial modes walk then pt.
fn commute() -> Vec<Trip> {
    Tour::from_activities(
        AgentId(0),
        vec![home().ending_at(8.0 * 3600.0), work().ending_at(17.0 * 3600.0), home()],
        &[Walk, Pt],
    )
    .unwrap()
    .trips
}

/// home → work → shop (1h) → home, initial modes walk, walk, pt.
fn three_trips() -> Vec<Trip> {
    Tour::from_activities(
        AgentId(0),
        vec![
            home().ending_at(8.0 * 3600.0),
            work().ending_at(17.0 * 3600.0),
            shop().lasting(3_600.0),
            home(),
        ],
        &[Walk, Walk, Pt],
    )
    .unwrap()
    .trips
}

/// home(→08:00) → work (1h) → shop (30 min) → home, initial modes walk,
/// pt, walk.  Only the first activity has a fixed end time.
fn duration_tour() -> Vec<Trip> {
    Tour::from_activities(
        AgentId(0),
        vec![
            home().ending_at(8.0 * 3600.0),
            work().lasting(3_600.0),
            shop().lasting(1_800.0),
            home(),
        ],
        &[Walk, Pt, Walk],
    )
    .unwrap()
    .trips
}

fn departures(trips: &[Trip]) -> Vec<f64> {
    trips.iter().filter_map(|t| t.departure_time).collect()
}

fn estimator() -> ConstantEstimator {
    ConstantEstimator::new()
        .with_alternative(Car, -1.0, 120.0)
        .with_alternative(Pt, -2.0, 600.0)
        .with_alternative(Walk, -3.0, 1_800.0)
        .with_alternative(Bike, -2.5, 900.0)
}

/// Oracle backed by a closure; counts calls and remembers every valid set.
struct FnOracle<F> {
    f:      F,
    calls:  AtomicUsize,
    offers: Mutex<Vec<(usize, Vec<TransportMode>)>>,
}

impl<F> FnOracle<F>
where
    F: Fn(&TripContext<'_>) -> OracleResult<TransportMode> + Send + Sync,
{
    fn new(f: F) -> Self {
        Self { f, calls: AtomicUsize::new(0), offers: Mutex::new(Vec::new()) }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn offers(&self) -> Vec<(usize, Vec<TransportMode>)> {
        self.offers.lock().unwrap().clone()
    }
}

impl<F> RecommendationOracle for FnOracle<F>
where
    F: Fn(&TripContext<'_>) -> OracleResult<TransportMode> + Send + Sync,
{
    fn propose(&self, ctx: &TripContext<'_>, _rng: &mut AgentRng) -> OracleResult<TransportMode> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.offers
            .lock()
            .unwrap()
            .push((ctx.trip.index, ctx.valid_modes.as_slice().to_vec()));
        (self.f)(ctx)
    }
}

/// Proposes the first of `order` that is currently valid.
fn prefer(order: &'static [TransportMode]) -> impl Fn(&TripContext<'_>) -> OracleResult<TransportMode> + Send + Sync {
    move |ctx| {
        order
            .iter()
            .copied()
            .find(|&m| ctx.valid_modes.contains(m))
            .ok_or(OracleError::NoValidModes)
    }
}

fn always_timeout(_ctx: &TripContext<'_>) -> OracleResult<TransportMode> {
    Err(OracleError::Timeout)
}

/// Post-estimation rule rejecting `mode` on the listed trips.
#[derive(Clone)]
struct RejectAfter {
    mode:  Option<TransportMode>,
    trips: Vec<usize>,
}

impl RejectAfter {
    fn mode_on(mode: TransportMode, trips: &[usize]) -> Self {
        Self { mode: Some(mode), trips: trips.to_vec() }
    }

    fn everything_on(trips: &[usize]) -> Self {
        Self { mode: None, trips: trips.to_vec() }
    }
}

impl TripConstraint for RejectAfter {
    fn validate_after_estimation(
        &self,
        trip:      &Trip,
        candidate: &TripCandidate,
        _previous: &[TripCandidate],
    ) -> bool {
        let hit_mode = self.mode.is_none_or(|m| m == candidate.mode());
        !(hit_mode && self.trips.contains(&trip.index))
    }
}

fn rejecting(rule: RejectAfter) -> crate::CompositeConstraintFactory {
    crate::CompositeConstraintFactory::new().with_constraint(rule)
}

#[derive(Clone, Debug, PartialEq)]
struct Recorded {
    agent:        AgentId,
    trip_indices: Vec<usize>,
    selection_id: u64,
    modes:        Vec<TransportMode>,
    selected:     Selected,
}

#[derive(Default)]
struct RecordingAuditor {
    records: Mutex<Vec<Recorded>>,
}

impl RecordingAuditor {
    fn records(&self) -> Vec<Recorded> {
        self.records.lock().unwrap().clone()
    }
}

impl SelectionAuditor for RecordingAuditor {
    fn record(&self, record: &SelectionRecord<'_>) -> Result<(), AuditError> {
        self.records.lock().unwrap().push(Recorded {
            agent:        record.agent,
            trip_indices: record.trip_indices.to_vec(),
            selection_id: record.selection_id.0,
            modes:        record.candidates.iter().map(TripCandidate::mode).collect(),
            selected:     record.selected,
        });
        Ok(())
    }
}

struct FailingAuditor;

impl SelectionAuditor for FailingAuditor {
    fn record(&self, _record: &SelectionRecord<'_>) -> Result<(), AuditError> {
        Err(AuditError::new("disk full"))
    }
}

fn modes_of(candidates: &[TripCandidate]) -> Vec<TransportMode> {
    candidates.iter().map(TripCandidate::mode).collect()
}

// ── Selection scenarios ───────────────────────────────────────────────────────

#[cfg(test)]
mod selection {
    use super::*;

    #[test]
    fn first_valid_proposal_is_accepted_in_one_call() {
        let model = TripBasedModelBuilder::new(FnOracle::new(prefer(&[Car])), estimator())
            .modes(ALL_FOUR)
            .build()
            .unwrap();
        let mut trips = single_trip();

        let chosen = model.select(&agent(0), &mut trips).unwrap();

        assert_eq!(chosen.len(), 1);
        assert_eq!(chosen[0].mode(), Car);
        assert_eq!(chosen[0].utility(), -1.0);
        assert_eq!(chosen[0].duration(), 120.0);
        assert_eq!(model.oracle().calls(), 1);
    }

    #[test]
    fn post_validation_rejection_retries_with_remaining_modes() {
        let model = TripBasedModelBuilder::new(FnOracle::new(prefer(&[Car, Pt])), estimator())
            .modes(ALL_FOUR)
            .constraints(rejecting(RejectAfter::mode_on(Car, &[0])))
            .build()
            .unwrap();

        let chosen = model.select(&agent(0), &mut single_trip()).unwrap();

        assert_eq!(modes_of(&chosen), vec![Pt]);
        assert_eq!(model.oracle().calls(), 2);
        let offers = model.oracle().offers();
        assert!(offers[0].1.contains(&Car));
        assert!(!offers[1].1.contains(&Car));
    }

    #[test]
    fn non_finite_utility_removes_mode_and_retries() {
        let est = ConstantEstimator::new().with_alternative(Pt, -2.0, 600.0);
        let model = TripBasedModelBuilder::new(FnOracle::new(prefer(&[Car, Pt])), est)
            .modes(ALL_FOUR)
            .build()
            .unwrap();

        let chosen = model.select(&agent(0), &mut single_trip()).unwrap();

        assert_eq!(modes_of(&chosen), vec![Pt]);
        assert_eq!(model.oracle().calls(), 2);
    }

    #[test]
    fn pre_validation_narrows_before_the_oracle_is_asked() {
        let rule = crate::MaxDistanceConstraint::new().limit(Walk, 1.0).limit(Bike, 1.0);
        let model = TripBasedModelBuilder::new(FnOracle::new(prefer(&[Walk, Pt])), estimator())
            .modes(ALL_FOUR)
            .constraints(crate::CompositeConstraintFactory::new().with_constraint(rule))
            .build()
            .unwrap();

        let chosen = model.select(&agent(0), &mut single_trip()).unwrap();

        assert_eq!(modes_of(&chosen), vec![Pt]);
        assert_eq!(model.oracle().offers()[0].1, vec![Car, Pt]);
    }

    #[test]
    fn narrowing_is_local_to_one_trip() {
        let model = TripBasedModelBuilder::new(FnOracle::new(prefer(&[Car, Pt])), estimator())
            .modes(ALL_FOUR)
            .constraints(rejecting(RejectAfter::mode_on(Car, &[0])))
            .build()
            .unwrap();

        let chosen = model.select(&agent(0), &mut commute()).unwrap();

        assert_eq!(modes_of(&chosen), vec![Pt, Car]);
        let second_trip_offer = model
            .oracle()
            .offers()
            .into_iter()
            .find(|(trip, _)| *trip == 1)
            .unwrap();
        assert_eq!(second_trip_offer.1, ALL_FOUR.to_vec());
    }

    #[test]
    fn oracle_sees_only_earlier_accepted_candidates() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let oracle = FnOracle::new(move |ctx: &TripContext<'_>| {
            log.lock().unwrap().push((ctx.trip.index, modes_of(ctx.prior)));
            Ok(Bike)
        });
        let model = TripBasedModelBuilder::new(oracle, estimator())
            .modes(ALL_FOUR)
            .build()
            .unwrap();

        model.select(&agent(0), &mut three_trips()).unwrap();

        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen, vec![(0, vec![]), (1, vec![Bike]), (2, vec![Bike, Bike])]);
    }

    #[test]
    fn proposal_outside_valid_set_counts_as_oracle_failure() {
        let model = TripBasedModelBuilder::new(FnOracle::new(|_: &TripContext<'_>| Ok(CarPassenger)), estimator())
            .modes(ALL_FOUR)
            .fallback(FallbackBehaviour::InitialChoice)
            .build()
            .unwrap();

        let chosen = model.select(&agent(0), &mut single_trip()).unwrap();

        assert_eq!(modes_of(&chosen), vec![Walk]);
        assert_eq!(model.oracle().calls(), 1);
    }

    #[test]
    fn filtered_trips_keep_initial_mode_without_oracle() {
        let model = TripBasedModelBuilder::new(FnOracle::new(prefer(&[Car])), estimator())
            .modes(ALL_FOUR)
            .trip_filter(crate::ActivityTypeFilter::excluding(["shop"]))
            .build()
            .unwrap();

        let chosen = model.select(&agent(0), &mut three_trips()).unwrap();

        // work → shop and shop → home both touch "shop".
        assert_eq!(modes_of(&chosen), vec![Car, Walk, Pt]);
        assert_eq!(model.oracle().calls(), 1);
    }

    #[test]
    fn departure_times_follow_the_clock() {
        let model = TripBasedModelBuilder::new(FnOracle::new(prefer(&[Pt])), estimator())
            .modes(ALL_FOUR)
            .build()
            .unwrap();
        let mut trips = three_trips();

        model.select(&agent(0), &mut trips).unwrap();

        let departures: Vec<f64> = trips.iter().map(|t| t.departure_time.unwrap()).collect();
        // 08:00, 17:00, then 17:00 + 600 s travel + 1 h shopping.
        assert_eq!(departures, vec![28_800.0, 61_200.0, 61_200.0 + 600.0 + 3_600.0]);
        assert!(departures.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn late_arrival_does_not_rewind_the_clock() {
        let slow = ConstantEstimator::new().with_alternative(Walk, -3.0, 10.0 * 3600.0);
        let model = TripBasedModelBuilder::new(FnOracle::new(prefer(&[Walk])), slow)
            .modes([Walk])
            .build()
            .unwrap();
        let mut trips = commute();

        model.select(&agent(0), &mut trips).unwrap();

        // Arrives at work at 18:00, after its 17:00 end time.
        assert_eq!(trips[1].departure_time, Some(18.0 * 3600.0));
    }

    #[test]
    fn same_seed_same_choices() {
        let run = || {
            let model = TripBasedModelBuilder::new(dmc_behavior::LogitOracle::new(0.2), estimator())
                .modes(ALL_FOUR)
                .seed(7)
                .build()
                .unwrap();
            modes_of(&model.select(&agent(3), &mut three_trips()).unwrap())
        };
        assert_eq!(run(), run());
    }
}

// ── Fallback policies ─────────────────────────────────────────────────────────

#[cfg(test)]
mod fallback {
    use super::*;

    #[test]
    fn timeout_falls_back_to_initial_choice() {
        let model = TripBasedModelBuilder::new(FnOracle::new(always_timeout), estimator())
            .modes(ALL_FOUR)
            .fallback(FallbackBehaviour::InitialChoice)
            .build()
            .unwrap();

        let chosen = model.select(&agent(0), &mut single_trip()).unwrap();

        assert_eq!(modes_of(&chosen), vec![Walk]);
        // Oracle failures are not retried.
        assert_eq!(model.oracle().calls(), 1);
    }

    #[test]
    fn timeout_under_exception_is_attributable() {
        let model = TripBasedModelBuilder::new(FnOracle::new(always_timeout), estimator())
            .modes(ALL_FOUR)
            .fallback(FallbackBehaviour::Exception)
            .build()
            .unwrap();

        let err = model.select(&agent(5), &mut commute()).unwrap_err();

        assert!(matches!(
            err,
            ChoiceError::NoFeasibleChoice { agent: AgentId(5), trip_index: 0 }
        ));
    }

    #[test]
    fn exhaustion_under_exception_names_the_trip() {
        let model = TripBasedModelBuilder::new(FnOracle::new(prefer(&ALL_FOUR)), estimator())
            .modes(ALL_FOUR)
            .constraints(rejecting(RejectAfter::everything_on(&[1])))
            .build()
            .unwrap();

        let err = model.select(&agent(2), &mut commute()).unwrap_err();

        assert!(matches!(
            err,
            ChoiceError::NoFeasibleChoice { agent: AgentId(2), trip_index: 1 }
        ));
        // Four modes tried on trip 1, one accepted on trip 0.
        assert_eq!(model.oracle().calls(), 5);
    }

    #[test]
    fn initial_choice_only_replaces_the_failing_trip() {
        let model = TripBasedModelBuilder::new(FnOracle::new(prefer(&[Car, Bike])), estimator())
            .modes([Car, Bike])
            .constraints(rejecting(RejectAfter::everything_on(&[1])))
            .fallback(FallbackBehaviour::InitialChoice)
            .build()
            .unwrap();

        let chosen = model.select(&agent(0), &mut three_trips()).unwrap();

        assert_eq!(modes_of(&chosen), vec![Car, Walk, Car]);
    }

    #[test]
    fn ignore_agent_reverts_the_whole_tour() {
        let model = TripBasedModelBuilder::new(FnOracle::new(prefer(&ALL_FOUR)), estimator())
            .modes(ALL_FOUR)
            .constraints(rejecting(RejectAfter::everything_on(&[1])))
            .fallback(FallbackBehaviour::IgnoreAgent)
            .build()
            .unwrap();
        let mut trips = commute();

        let chosen = model.select(&agent(0), &mut trips).unwrap();

        // Trip 0 had been accepted with car; both trips revert.
        assert_eq!(chosen.len(), 2);
        let est = estimator();
        let expected_first = dmc_behavior::CandidateEstimator::estimate(&est, &agent(0), Walk, &trips[0], &[]);
        assert_eq!(chosen[0], expected_first);
        assert_eq!(modes_of(&chosen), vec![Walk, Pt]);
        // Re-timed with the walking duration.
        assert_eq!(trips[1].departure_time, Some(17.0 * 3600.0));
    }

    #[test]
    fn initial_choice_keeps_the_clock_monotonic() {
        let model = TripBasedModelBuilder::new(FnOracle::new(prefer(&ALL_FOUR)), estimator())
            .modes(ALL_FOUR)
            .constraints(rejecting(RejectAfter::everything_on(&[1])))
            .fallback(FallbackBehaviour::InitialChoice)
            .build()
            .unwrap();
        let mut trips = duration_tour();

        let chosen = model.select(&agent(0), &mut trips).unwrap();

        assert_eq!(modes_of(&chosen), vec![Car, Pt, Car]);
        let times = departures(&trips);
        assert_eq!(times.len(), 3);
        assert!(times.windows(2).all(|w| w[0] <= w[1]), "{times:?}");
        // 08:00 + car 120 s + work 1 h, then + pt 600 s + shop 30 min.
        assert_eq!(times, vec![28_800.0, 32_520.0, 34_920.0]);
    }

    #[test]
    fn ignore_agent_retimes_the_tour_monotonically() {
        let model = TripBasedModelBuilder::new(FnOracle::new(prefer(&ALL_FOUR)), estimator())
            .modes(ALL_FOUR)
            .constraints(rejecting(RejectAfter::everything_on(&[1])))
            .fallback(FallbackBehaviour::IgnoreAgent)
            .build()
            .unwrap();
        let mut trips = duration_tour();

        let chosen = model.select(&agent(0), &mut trips).unwrap();

        assert_eq!(modes_of(&chosen), vec![Walk, Pt, Walk]);
        let times = departures(&trips);
        assert!(times.windows(2).all(|w| w[0] <= w[1]), "{times:?}");
        // Trip 1 had departed at 32 520 s behind car; walking moves it later.
        assert_eq!(times, vec![28_800.0, 34_200.0, 36_600.0]);
    }

    #[test]
    fn every_policy_returns_one_candidate_per_trip() {
        for policy in [FallbackBehaviour::InitialChoice, FallbackBehaviour::IgnoreAgent] {
            for failing in [vec![], vec![0], vec![1], vec![0, 2], vec![0, 1, 2]] {
                let model = TripBasedModelBuilder::new(FnOracle::new(prefer(&ALL_FOUR)), estimator())
                    .modes(ALL_FOUR)
                    .constraints(rejecting(RejectAfter::everything_on(&failing)))
                    .fallback(policy)
                    .build()
                    .unwrap();
                let chosen = model.select(&agent(0), &mut three_trips()).unwrap();
                assert_eq!(chosen.len(), 3, "{policy} failing {failing:?}");
            }
        }
    }

    #[test]
    fn parse_policy_names() {
        assert_eq!("INITIAL_CHOICE".parse::<FallbackBehaviour>().unwrap(), FallbackBehaviour::InitialChoice);
        assert_eq!("IGNORE_AGENT".parse::<FallbackBehaviour>().unwrap(), FallbackBehaviour::IgnoreAgent);
        assert_eq!("EXCEPTION".parse::<FallbackBehaviour>().unwrap(), FallbackBehaviour::Exception);
        assert!(matches!(
            "initial_choice".parse::<FallbackBehaviour>(),
            Err(ChoiceError::Config(_))
        ));
        assert_eq!(FallbackBehaviour::IgnoreAgent.to_string(), "IGNORE_AGENT");
    }
}

// ── Auditing ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod auditing {
    use super::*;

    #[test]
    fn one_record_per_trip_with_evaluated_candidates() {
        let sink = Arc::new(RecordingAuditor::default());
        let model = TripBasedModelBuilder::new(FnOracle::new(prefer(&[Car, Pt])), estimator())
            .modes(ALL_FOUR)
            .constraints(rejecting(RejectAfter::mode_on(Car, &[0])))
            .auditor(Arc::clone(&sink))
            .build()
            .unwrap();

        model.select(&agent(4), &mut commute()).unwrap();

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].agent, AgentId(4));
        assert_eq!(records[0].trip_indices, vec![0]);
        assert_eq!(records[0].modes, vec![Car, Pt]);
        assert_eq!(records[0].selected, Selected::Index(1));
        assert_eq!(records[1].trip_indices, vec![1]);
        assert_eq!(records[1].modes, vec![Car]);
        assert_eq!(records[1].selected, Selected::Index(0));
        assert!(records[0].selection_id < records[1].selection_id);
    }

    #[test]
    fn fallback_candidate_is_recorded_as_selected() {
        let sink = Arc::new(RecordingAuditor::default());
        let model = TripBasedModelBuilder::new(FnOracle::new(prefer(&[Car])), estimator())
            .modes([Car])
            .constraints(rejecting(RejectAfter::everything_on(&[0])))
            .fallback(FallbackBehaviour::InitialChoice)
            .auditor(Arc::clone(&sink))
            .build()
            .unwrap();

        model.select(&agent(0), &mut single_trip()).unwrap();

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].modes, vec![Car, Walk]);
        assert_eq!(records[0].selected, Selected::Index(1));
    }

    #[test]
    fn ignore_agent_writes_a_tour_record() {
        let sink = Arc::new(RecordingAuditor::default());
        let model = TripBasedModelBuilder::new(FnOracle::new(prefer(&ALL_FOUR)), estimator())
            .modes(ALL_FOUR)
            .constraints(rejecting(RejectAfter::everything_on(&[1])))
            .fallback(FallbackBehaviour::IgnoreAgent)
            .auditor(Arc::clone(&sink))
            .build()
            .unwrap();

        model.select(&agent(0), &mut commute()).unwrap();

        let records = sink.records();
        let last = records.last().unwrap();
        assert_eq!(last.trip_indices, vec![0, 1]);
        assert_eq!(last.modes, vec![Walk, Pt]);
        assert_eq!(last.selected, Selected::All);
    }

    #[test]
    fn sink_failure_does_not_change_the_outcome() {
        let model = TripBasedModelBuilder::new(FnOracle::new(prefer(&[Car])), estimator())
            .modes(ALL_FOUR)
            .auditor(FailingAuditor)
            .build()
            .unwrap();

        let chosen = model.select(&agent(0), &mut commute()).unwrap();

        assert_eq!(modes_of(&chosen), vec![Car, Car]);
    }

    #[test]
    fn record_selection_helpers() {
        let candidates = [TripCandidate::new(Car, -1.0, 60.0), TripCandidate::new(Pt, -2.0, 90.0)];
        let record = SelectionRecord {
            agent:        AgentId(1),
            trip_indices: &[0],
            selection_id: dmc_core::SelectionId(9),
            candidates:   &candidates,
            selected:     Selected::Index(1),
        };
        assert!(!record.is_selected(0));
        assert!(record.is_selected(1));
        assert_eq!(record.selected_candidate().map(|c| c.mode()), Some(Pt));

        let tour = SelectionRecord { selected: Selected::All, ..record };
        assert!(tour.is_selected(0) && tour.is_selected(1));
        assert!(tour.selected_candidate().is_none());
    }
}

// ── Availability ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod availability {
    use super::*;
    use crate::{CarModeAvailability, ModeAvailability};

    #[test]
    fn car_availability_drops_car_for_non_drivers() {
        let avail = CarModeAvailability::new(ALL_FOUR);
        let non_driver = AgentBuilder::new(AgentId(1)).attribute(keys::HAS_LICENSE, false).build();
        assert_eq!(avail.available_modes(&agent(0), &[]), ALL_FOUR.to_vec());
        assert_eq!(avail.available_modes(&non_driver, &[]), vec![Pt, Walk, Bike]);
    }

    #[test]
    fn empty_mode_set_fails_before_any_trip() {
        let model = TripBasedModelBuilder::new(FnOracle::new(prefer(&[Car])), estimator())
            .availability(CarModeAvailability::new([Car]))
            .build()
            .unwrap();
        let mut trips = commute();

        let err = model.select(&Agent::new(AgentId(8)), &mut trips).unwrap_err();

        assert!(matches!(err, ChoiceError::EmptyModeSet { agent: AgentId(8) }));
        assert_eq!(model.oracle().calls(), 0);
        assert!(trips.iter().all(|t| t.departure_time.is_none()));
    }

    #[test]
    fn empty_mode_list_is_a_build_error() {
        let result = TripBasedModelBuilder::new(FnOracle::new(prefer(&[Car])), estimator())
            .modes([])
            .build();
        assert!(matches!(result, Err(ChoiceError::Config(_))));
    }
}

// ── Constraints ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod constraints {
    use super::*;
    use crate::{
        CompositeConstraint, CompositeConstraintFactory, MaxDistanceConstraint,
        MaxTravelTimeConstraint, TimeWindowConstraint, TripConstraintFactory,
        VehicleContinuityConstraint, VehicleContinuityConstraintFactory,
    };

    #[test]
    fn vehicle_stays_where_it_was_left() {
        let trips = three_trips();
        let rule = VehicleContinuityConstraint::for_trips(&trips);

        // Tour start: the car is at home.
        assert!(rule.validate_before_estimation(&trips[0], Car, &[]));
        // Walked to work: the car is still at home.
        assert!(!rule.validate_before_estimation(&trips[1], Car, &[Walk]));
        assert!(rule.validate_before_estimation(&trips[1], Pt, &[Walk]));
        // Drove to work: the car is at work.
        assert!(rule.validate_before_estimation(&trips[1], Car, &[Car]));
        // Bike left at home, car at shop.
        assert!(!rule.validate_before_estimation(&trips[2], Bike, &[Car, Car]));
        assert!(rule.validate_before_estimation(&trips[2], Car, &[Car, Car]));
    }

    #[test]
    fn vehicle_continuity_in_the_loop() {
        let model = TripBasedModelBuilder::new(FnOracle::new(prefer(&[Car, Pt])), estimator())
            .modes(ALL_FOUR)
            .constraints(CompositeConstraintFactory::new().with_factory(VehicleContinuityConstraintFactory))
            .build()
            .unwrap();

        // Drove to work, so the car is there for the way back.
        let chosen = model.select(&agent(0), &mut commute()).unwrap();
        assert_eq!(modes_of(&chosen), vec![Car, Car]);

        let rejecting_car_first = TripBasedModelBuilder::new(FnOracle::new(prefer(&[Car, Pt])), estimator())
            .modes(ALL_FOUR)
            .constraints(
                CompositeConstraintFactory::new()
                    .with_factory(VehicleContinuityConstraintFactory)
                    .with_constraint(RejectAfter::mode_on(Car, &[0])),
            )
            .build()
            .unwrap();
        let chosen = rejecting_car_first.select(&agent(0), &mut commute()).unwrap();
        // Took pt to work, so the car is still at home.
        assert_eq!(modes_of(&chosen), vec![Pt, Pt]);
    }

    #[test]
    fn max_distance_applies_per_mode() {
        let trip = &single_trip()[0]; // 5 km
        let rule = MaxDistanceConstraint::new().limit(Walk, 2.0).limit(Bike, 10.0);
        assert!(!rule.validate_before_estimation(trip, Walk, &[]));
        assert!(rule.validate_before_estimation(trip, Bike, &[]));
        assert!(rule.validate_before_estimation(trip, Car, &[]));
    }

    #[test]
    fn max_travel_time_with_override() {
        let trip = &single_trip()[0];
        let rule = MaxTravelTimeConstraint::new(1_000.0).limit(Walk, 2_000.0);
        assert!(rule.validate_after_estimation(trip, &TripCandidate::new(Car, 0.0, 900.0), &[]));
        assert!(!rule.validate_after_estimation(trip, &TripCandidate::new(Pt, 0.0, 1_100.0), &[]));
        assert!(rule.validate_after_estimation(trip, &TripCandidate::new(Walk, 0.0, 1_800.0), &[]));
    }

    #[test]
    fn time_window_checks_arrival_against_destination_end() {
        let mut trip = Trip::new(0, home(), work().ending_at(9.0 * 3600.0), Walk);
        let rule = TimeWindowConstraint::new(300.0);
        let hour = TripCandidate::new(Walk, 0.0, 3_600.0);

        // No departure time yet: nothing to check.
        assert!(rule.validate_after_estimation(&trip, &hour, &[]));

        trip.set_departure_time(8.0 * 3600.0);
        assert!(rule.validate_after_estimation(&trip, &hour, &[]));
        trip.set_departure_time(8.0 * 3600.0 + 301.0);
        assert!(!rule.validate_after_estimation(&trip, &hour, &[]));
    }

    #[test]
    fn composite_is_conjunctive() {
        let trip = &single_trip()[0];
        let empty = CompositeConstraint::default();
        assert!(empty.is_empty());
        assert!(empty.validate_before_estimation(trip, Walk, &[]));

        let factory = CompositeConstraintFactory::new()
            .with_constraint(MaxDistanceConstraint::new().limit(Walk, 2.0))
            .with_constraint(MaxTravelTimeConstraint::new(600.0));
        assert_eq!(factory.len(), 2);
        let modes = TourModeSet::new(ALL_FOUR).unwrap();
        let composite = factory.create(&agent(0), &single_trip(), &modes);

        assert!(!composite.validate_before_estimation(trip, Walk, &[]));
        assert!(composite.validate_before_estimation(trip, Pt, &[]));
        assert!(!composite.validate_after_estimation(trip, &TripCandidate::new(Pt, 0.0, 700.0), &[]));
        assert!(composite.validate_after_estimation(trip, &TripCandidate::new(Pt, 0.0, 500.0), &[]));
    }
}

// ── Trip filters ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod filters {
    use super::*;
    use crate::{ActivityTypeFilter, AllTrips, CompositeTripFilter, TripFilter};

    #[test]
    fn activity_type_filter_checks_both_ends() {
        let trips = three_trips();
        let filter = ActivityTypeFilter::excluding(["shop"]);
        let a = agent(0);
        assert!(filter.applies(&a, &trips[0]));
        assert!(!filter.applies(&a, &trips[1]));
        assert!(!filter.applies(&a, &trips[2]));
    }

    #[test]
    fn composite_filter_is_conjunctive() {
        let trips = three_trips();
        let a = agent(0);
        assert!(CompositeTripFilter::new().applies(&a, &trips[1]));

        let filter = CompositeTripFilter::new()
            .with_filter(AllTrips)
            .with_filter(ActivityTypeFilter::excluding(["work"]));
        assert!(!filter.applies(&a, &trips[0]));
        assert!(filter.applies(&a, &trips[2]));
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use std::io::Write;

    use super::*;
    use crate::{ModeChoiceConfig, OracleConfig};

    #[test]
    fn empty_document_uses_defaults() {
        let config = ModeChoiceConfig::from_toml_str("").unwrap();
        assert_eq!(config, ModeChoiceConfig::default());
        assert_eq!(config.modes, TransportMode::ALL.to_vec());
        assert_eq!(config.fallback, FallbackBehaviour::Exception);
    }

    #[test]
    fn full_document() {
        let config = ModeChoiceConfig::from_toml_str(
            r#"
            modes = ["car", "pt", "walk"]
            fallback = "IGNORE_AGENT"
            time_interpretation = "end_time_only"
            seed = 42

            [oracle]
            type = "llm"
            model = "mistral"
            timeout_secs = 5
            stock_personas = true
            "#,
        )
        .unwrap();

        assert_eq!(config.modes, vec![Car, Pt, Walk]);
        assert_eq!(config.fallback, FallbackBehaviour::IgnoreAgent);
        assert_eq!(config.time_interpretation, dmc_core::TimeInterpretation::EndTimeOnly);
        assert_eq!(config.seed, 42);
        match &config.oracle {
            OracleConfig::Llm { model, temperature, host, timeout_secs, stock_personas } => {
                assert_eq!(model, "mistral");
                assert_eq!(*temperature, 1.2);
                assert_eq!(host, "http://localhost:11434");
                assert_eq!(*timeout_secs, 5);
                assert!(*stock_personas);
            }
            other => panic!("unexpected oracle {other:?}"),
        }
        assert_eq!(config.oracle.persona_source(), dmc_behavior::PersonaSource::Sample);
    }

    #[test]
    fn invalid_values_are_config_errors() {
        for text in [
            "modes = []",
            "fallback = \"RETRY\"",
            "modes = [\"hovercraft\"]",
            "[oracle]\ntype = \"logit\"\nscale = 0.0",
            "[oracle]\ntype = \"llm\"\ntemperature = -1.0",
            "[oracle]\ntype = \"llm\"\ntimeout_secs = 0",
            "[oracle]\ntype = \"telepathy\"",
            "colour = \"blue\"",
        ] {
            assert!(
                matches!(ModeChoiceConfig::from_toml_str(text), Err(ChoiceError::Config(_))),
                "{text}"
            );
        }
    }

    #[test]
    fn builds_rule_based_and_logit_oracles() {
        let rule = OracleConfig::RuleBased { preference: Some(vec![Pt, Car]), walk_below_km: None };
        assert_eq!(rule.build().unwrap().name(), "rule_based");
        assert_eq!(OracleConfig::Logit { scale: 2.0 }.build().unwrap().name(), "logit");
    }

    #[cfg(not(feature = "llm"))]
    #[test]
    fn llm_oracle_needs_the_feature() {
        let config = ModeChoiceConfig::from_toml_str("[oracle]\ntype = \"llm\"").unwrap();
        assert!(matches!(config.oracle.build(), Err(ChoiceError::Config(_))));
    }

    #[test]
    fn configured_model_runs() {
        let config = ModeChoiceConfig::from_toml_str(
            r#"
            modes = ["pt", "walk"]
            fallback = "INITIAL_CHOICE"

            [oracle]
            type = "rule_based"
            preference = ["pt", "walk"]
            "#,
        )
        .unwrap();
        let model = config.model_builder(estimator()).unwrap().build().unwrap();
        let chosen = model.select(&agent(0), &mut commute()).unwrap();
        assert_eq!(modes_of(&chosen), vec![Pt, Pt]);
        assert_eq!(model.fallback(), FallbackBehaviour::InitialChoice);
    }

    #[test]
    fn from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "seed = 9\nfallback = \"EXCEPTION\"").unwrap();
        let config = ModeChoiceConfig::from_path(file.path()).unwrap();
        assert_eq!(config.seed, 9);

        let missing = ModeChoiceConfig::from_path(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(ChoiceError::Io(_))));
    }
}

// ── Population ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod population {
    use super::*;
    use crate::select_population;

    #[test]
    fn results_in_input_order() {
        let population: Population = (0..4).map(agent).collect();
        let mut tours: Vec<Tour> = (0..4)
            .rev()
            .map(|i| Tour::new(AgentId(i), commute()))
            .collect();
        tours.push(Tour::new(AgentId(99), commute()));

        let model = TripBasedModelBuilder::new(FnOracle::new(prefer(&[Bike])), estimator())
            .modes(ALL_FOUR)
            .build()
            .unwrap();
        let results = select_population(&model, &population, &mut tours);

        assert_eq!(results.len(), 5);
        for result in &results[..4] {
            assert_eq!(modes_of(result.as_ref().unwrap()), vec![Bike, Bike]);
        }
        assert!(matches!(results[4], Err(ChoiceError::UnknownAgent(AgentId(99)))));
        assert!(tours[0].trips.iter().all(|t| t.departure_time.is_some()));
    }
}
