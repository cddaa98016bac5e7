//! `dmc-schedule` — activities, trips, and daily tours.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`activity`]  | `Activity` (type, location, timing)                       |
//! | [`trip`]      | `Trip` (origin → destination, initial mode, departure)    |
//! | [`tour`]      | `Tour` — the ordered trips of one agent's day             |
//! | [`error`]     | `ScheduleError`, `ScheduleResult<T>`                      |
//!
//! # Tour model (summary)
//!
//! A daily plan alternates activities and trips:
//!
//! ```text
//! home ──trip 0──▶ work ──trip 1──▶ shop ──trip 2──▶ home
//! ```
//!
//! Trip `i` connects activity `i` to activity `i + 1`.  The only trip field
//! the choice engine writes is the departure time, which it derives from the
//! running clock before estimating the trip.

pub mod activity;
pub mod error;
pub mod tour;
pub mod trip;


pub use activity::Activity;
pub use error::{ScheduleError, ScheduleResult};
pub use tour::Tour;
pub use trip::Trip;
