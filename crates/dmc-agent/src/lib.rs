//! `dmc-agent` — travellers and their attributes.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`attributes`]  | `AttributeValue`, `Attributes`, well-known `keys`         |
//! | [`agent`]       | `Agent` (id + attributes), `Population`                   |
//! | [`builder`]     | `AgentBuilder` (fluent construction)                      |
//! | [`profile`]     | `AgentProfile` — human-readable view derived from attributes |
//!
//! The choice engine never interprets attributes itself; it passes agents
//! through to estimators, oracles, and constraints, which read whatever keys
//! they care about.

pub mod agent;
pub mod attributes;
pub mod builder;
pub mod profile;


pub use agent::{Agent, Population};
pub use attributes::{AttributeValue, Attributes, keys};
pub use builder::AgentBuilder;
pub use profile::AgentProfile;
