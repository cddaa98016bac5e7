//! A planned activity: what, where, and until when.

use dmc_core::{ActivityTiming, Coord};

/// One activity of a daily plan.
///
/// `activity_type` is application-defined (`home`, `work`, `shop`, …).  The
/// timing fields follow the usual plan conventions: an explicit end time, a
/// maximum duration, or both; how they combine is decided by the
/// [`TimeInterpretation`][dmc_core::TimeInterpretation] in use.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Activity {
    pub activity_type: String,
    pub coord:         Coord,
    /// Planned end time, seconds since midnight.
    pub end_time:      Option<f64>,
    /// Planned duration, seconds.
    pub max_duration:  Option<f64>,
}

impl Activity {
    /// An activity without timing information (typically the last one of
    /// the day).
    pub fn new(activity_type: impl Into<String>, coord: Coord) -> Self {
        Self {
            activity_type: activity_type.into(),
            coord,
            end_time: None,
            max_duration: None,
        }
    }

    /// Builder-style setter for the planned end time.
    pub fn ending_at(mut self, secs: f64) -> Self {
        self.end_time = Some(secs);
        self
    }

    /// Builder-style setter for the planned duration.
    pub fn lasting(mut self, secs: f64) -> Self {
        self.max_duration = Some(secs);
        self
    }

    pub fn timing(&self) -> ActivityTiming {
        ActivityTiming {
            end_time:     self.end_time,
            max_duration: self.max_duration,
        }
    }
}
