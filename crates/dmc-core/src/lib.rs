//! `dmc-core` — foundational types for the `rust_dmc` mode choice framework.
//!
//! This crate is a dependency of every other `dmc-*` crate.  It intentionally
//! has no `dmc-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `SelectionId`                                  |
//! | [`geo`]         | `Coord`, planar distances                                 |
//! | [`time`]        | `TimeTracker`, `TimeInterpretation`, `ActivityTiming`     |
//! | [`rng`]         | `AgentRng` (per-agent)                                    |
//! | [`transport`]   | `TransportMode` enum                                      |
//! | [`mode_set`]    | `TourModeSet` (immutable), `CandidateModeSet` (per trip)  |
//! | [`candidate`]   | `TripCandidate`                                           |
//! | [`error`]       | `DmcError`, `DmcResult`                                   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod candidate;
pub mod error;
pub mod geo;
pub mod ids;
pub mod mode_set;
pub mod rng;
pub mod time;
pub mod transport;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use candidate::TripCandidate;
pub use error::{DmcError, DmcResult};
pub use geo::Coord;
pub use ids::{AgentId, SelectionId};
pub use mode_set::{CandidateModeSet, TourModeSet};
pub use rng::AgentRng;
pub use time::{ActivityTiming, TimeInterpretation, TimeTracker, format_clock};
pub use transport::TransportMode;
