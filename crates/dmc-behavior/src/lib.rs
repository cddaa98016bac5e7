//! `dmc-behavior` — the two judgement calls the choice engine delegates:
//! how good is a mode for a trip (estimator) and which mode should the
//! traveller take (oracle).
//!
//! # Crate layout
//!
//! | Module        | Contents                                                       |
//! |---------------|----------------------------------------------------------------|
//! | [`estimator`] | `CandidateEstimator` trait, `ConstantEstimator`, `SpeedEstimator` |
//! | [`context`]   | `TripContext<'a>` — everything an oracle may look at           |
//! | [`oracle`]    | `RecommendationOracle` trait                                   |
//! | [`normalize`] | `normalize_response` — free text → `TransportMode`             |
//! | [`rule`]      | `RuleBasedOracle` — preference order plus simple rules         |
//! | [`logit`]     | `LogitOracle` — multinomial logit sampling                     |
//! | [`llm`]       | `LlmOracle<T>`, `ChatTransport`, prompts, personas, `OllamaClient` |
//! | [`error`]     | `OracleError`, `OracleResult<T>`                               |
//!
//! # Design notes
//!
//! Both traits are `Send + Sync` and take `&self`: one estimator and one
//! oracle serve many tours concurrently.  Per-tour randomness arrives as an
//! explicit `&mut AgentRng`, so a stochastic oracle stays reproducible no
//! matter which thread runs the tour.
//!
//! # Cargo features
//!
//! | Feature | Effect                                                   |
//! |---------|----------------------------------------------------------|
//! | `llm`   | Enables `OllamaClient`, an HTTP `ChatTransport`.         |

pub mod context;
pub mod error;
pub mod estimator;
pub mod llm;
pub mod logit;
pub mod normalize;
pub mod oracle;
pub mod rule;


pub use context::TripContext;
pub use error::{OracleError, OracleResult};
pub use estimator::{CandidateEstimator, ConstantEstimator, ModeSpeed, SpeedEstimator};
pub use llm::{ChatTransport, LlmOracle, PersonaSource};
pub use logit::LogitOracle;
pub use normalize::normalize_response;
pub use oracle::RecommendationOracle;
pub use rule::RuleBasedOracle;

#[cfg(feature = "llm")]
pub use llm::ollama::OllamaClient;
