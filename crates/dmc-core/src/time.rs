//! Simulated time along a tour.
//!
//! # Design
//!
//! Time is seconds since midnight of the simulated day, stored as `f64` to
//! match the durations estimators return.  A [`TimeTracker`] walks the tour:
//!
//! ```text
//! for trip in tour:
//!   tracker.add_activity(trip.origin.timing())   // wait until origin ends
//!   trip.departure_time = tracker.time()
//!   ... choose a mode ...
//!   tracker.add_duration(chosen.duration())      // travel
//! ```
//!
//! The clock never runs backwards.  An activity whose planned end lies
//! before the current clock (the agent arrived late) ends "now" instead.

use std::fmt;

// ── ActivityTiming ────────────────────────────────────────────────────────────

/// The timing fields of a planned activity, both optional.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivityTiming {
    /// Planned end time, seconds since midnight.
    pub end_time: Option<f64>,
    /// Planned duration, seconds.
    pub max_duration: Option<f64>,
}

// ── TimeInterpretation ────────────────────────────────────────────────────────

/// How an activity's end time is derived from its timing fields.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TimeInterpretation {
    /// Use the end time if set, otherwise `now + max_duration`.
    #[default]
    TryEndTimeThenDuration,
    /// Use the end time only; activities without one do not move the clock.
    EndTimeOnly,
    /// The earlier of the end time and `now + max_duration`.
    MinOfDurationAndEndTime,
}

impl TimeInterpretation {
    /// End time of an activity that starts at `now`, or `None` when the
    /// timing fields leave it undefined.
    pub fn end_time(self, timing: ActivityTiming, now: f64) -> Option<f64> {
        let end = timing.end_time.filter(|t| t.is_finite());
        let by_duration = timing
            .max_duration
            .filter(|d| d.is_finite())
            .map(|d| now + d.max(0.0));

        match self {
            TimeInterpretation::TryEndTimeThenDuration => end.or(by_duration),
            TimeInterpretation::EndTimeOnly => end,
            TimeInterpretation::MinOfDurationAndEndTime => match (end, by_duration) {
                (Some(e), Some(d)) => Some(e.min(d)),
                (e, d) => e.or(d),
            },
        }
    }
}

// ── TimeTracker ───────────────────────────────────────────────────────────────

/// Running simulated clock for one tour.
///
/// Pure state machine: no I/O, no failure modes.  Monotonically
/// non-decreasing.
#[derive(Clone, Debug)]
pub struct TimeTracker {
    interpretation: TimeInterpretation,
    time:           f64,
}

impl TimeTracker {
    /// A tracker starting at midnight.
    pub fn new(interpretation: TimeInterpretation) -> Self {
        Self { interpretation, time: 0.0 }
    }

    /// Current simulated time in seconds since midnight.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Advance to the end of an activity that starts at the current time.
    ///
    /// Undefined end times leave the clock unchanged; end times in the past
    /// are shifted to the current time.
    pub fn add_activity(&mut self, timing: ActivityTiming) {
        if let Some(end) = self.interpretation.end_time(timing, self.time) {
            self.time = self.time.max(end);
        }
    }

    /// Advance by a travel duration.  Negative and non-finite durations are
    /// ignored.
    pub fn add_duration(&mut self, secs: f64) {
        if secs.is_finite() && secs > 0.0 {
            self.time += secs;
        }
    }
}

impl fmt::Display for TimeTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_clock(self.time))
    }
}

/// Render seconds since midnight as `HH:MM:SS`.  Times past midnight keep
/// counting hours (`25:30:00`) as is usual for daily plans.
pub fn format_clock(secs: f64) -> String {
    let total = if secs.is_finite() { secs.max(0.0) as u64 } else { 0 };
    let hours = total / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
