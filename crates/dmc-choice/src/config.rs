//! TOML run configuration.
//!
//! ```toml
//! modes = ["car", "pt", "bike", "walk"]
//! fallback = "INITIAL_CHOICE"
//! time_interpretation = "try_end_time_then_duration"
//! seed = 42
//!
//! [oracle]
//! type = "llm"              # "rule_based" | "logit" | "llm"
//! model = "llama3.2:3b"
//! temperature = 1.2
//! host = "http://localhost:11434"
//! timeout_secs = 60
//! ```
//!
//! Every field has a default, so an empty document is a valid
//! configuration (all modes, `EXCEPTION`, rule-based oracle).

use std::path::Path;

use dmc_behavior::{
    CandidateEstimator, LogitOracle, PersonaSource, RecommendationOracle, RuleBasedOracle,
};
use dmc_core::{TimeInterpretation, TransportMode};
use serde::{Deserialize, Serialize};

use crate::{ChoiceError, ChoiceResult, FallbackBehaviour, TripBasedModelBuilder};

fn default_modes() -> Vec<TransportMode> {
    TransportMode::ALL.to_vec()
}

// ── ModeChoiceConfig ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModeChoiceConfig {
    /// Modes offered to every agent.
    pub modes:               Vec<TransportMode>,
    pub fallback:            FallbackBehaviour,
    pub time_interpretation: TimeInterpretation,
    pub seed:                u64,
    pub oracle:              OracleConfig,
}

impl Default for ModeChoiceConfig {
    fn default() -> Self {
        Self {
            modes:               default_modes(),
            fallback:            FallbackBehaviour::default(),
            time_interpretation: TimeInterpretation::default(),
            seed:                0,
            oracle:              OracleConfig::default(),
        }
    }
}

impl ModeChoiceConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> ChoiceResult<Self> {
        let config: ModeChoiceConfig =
            toml::from_str(text).map_err(|e| ChoiceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> ChoiceResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> ChoiceResult<()> {
        if self.modes.is_empty() {
            return Err(ChoiceError::Config("`modes` must not be empty".into()));
        }
        self.oracle.validate()
    }

    /// A model builder with modes, fallback, time interpretation, seed, and
    /// the configured oracle applied.
    pub fn model_builder<E: CandidateEstimator>(
        &self,
        estimator: E,
    ) -> ChoiceResult<TripBasedModelBuilder<Box<dyn RecommendationOracle>, E>> {
        self.validate()?;
        Ok(TripBasedModelBuilder::new(self.oracle.build()?, estimator)
            .modes(self.modes.iter().copied())
            .fallback(self.fallback)
            .time_interpretation(self.time_interpretation)
            .seed(self.seed))
    }
}

// ── OracleConfig ──────────────────────────────────────────────────────────────

/// Which oracle to run, with its parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OracleConfig {
    RuleBased {
        /// Preference order; the default order when absent.
        #[serde(default)]
        preference:    Option<Vec<TransportMode>>,
        #[serde(default)]
        walk_below_km: Option<f64>,
    },
    Logit {
        #[serde(default = "default_scale")]
        scale: f64,
    },
    Llm {
        #[serde(default = "default_model")]
        model:          String,
        #[serde(default = "default_temperature")]
        temperature:    f64,
        #[serde(default = "default_host")]
        host:           String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs:   u64,
        /// Draw personas from the stock list instead of generating them.
        #[serde(default)]
        stock_personas: bool,
    },
}

fn default_scale() -> f64 {
    1.0
}

fn default_model() -> String {
    "llama3.2:3b".to_owned()
}

fn default_temperature() -> f64 {
    1.2
}

fn default_host() -> String {
    "http://localhost:11434".to_owned()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for OracleConfig {
    fn default() -> Self {
        OracleConfig::RuleBased { preference: None, walk_below_km: None }
    }
}

impl OracleConfig {
    pub fn validate(&self) -> ChoiceResult<()> {
        match self {
            OracleConfig::RuleBased { preference, walk_below_km } => {
                if preference.as_ref().is_some_and(Vec::is_empty) {
                    return Err(ChoiceError::Config("rule_based `preference` must not be empty".into()));
                }
                if walk_below_km.is_some_and(|km| !km.is_finite() || km < 0.0) {
                    return Err(ChoiceError::Config("`walk_below_km` must be non-negative".into()));
                }
            }
            OracleConfig::Logit { scale } => {
                if !scale.is_finite() || *scale <= 0.0 {
                    return Err(ChoiceError::Config(format!("logit `scale` must be positive, got {scale}")));
                }
            }
            OracleConfig::Llm { model, temperature, timeout_secs, .. } => {
                if model.trim().is_empty() {
                    return Err(ChoiceError::Config("llm `model` must not be empty".into()));
                }
                if !temperature.is_finite() || *temperature < 0.0 {
                    return Err(ChoiceError::Config(format!(
                        "llm `temperature` must be non-negative, got {temperature}"
                    )));
                }
                if *timeout_secs == 0 {
                    return Err(ChoiceError::Config("llm `timeout_secs` must be positive".into()));
                }
            }
        }
        Ok(())
    }

    /// Instantiate the configured oracle.
    pub fn build(&self) -> ChoiceResult<Box<dyn RecommendationOracle>> {
        self.validate()?;
        match self {
            OracleConfig::RuleBased { preference, walk_below_km } => {
                let mut oracle = match preference {
                    Some(order) => RuleBasedOracle::new(order.iter().copied()),
                    None => RuleBasedOracle::default(),
                };
                if let Some(km) = walk_below_km {
                    oracle = oracle.walk_below_km(*km);
                }
                Ok(Box::new(oracle))
            }
            OracleConfig::Logit { scale } => Ok(Box::new(LogitOracle::new(*scale))),
            OracleConfig::Llm { .. } => self.build_llm(),
        }
    }

    /// How the LLM oracle obtains personas; `Generate` for other oracles.
    pub fn persona_source(&self) -> PersonaSource {
        match self {
            OracleConfig::Llm { stock_personas: true, .. } => PersonaSource::Sample,
            _ => PersonaSource::Generate,
        }
    }

    #[cfg(feature = "llm")]
    fn build_llm(&self) -> ChoiceResult<Box<dyn RecommendationOracle>> {
        use std::time::Duration;

        use dmc_behavior::{LlmOracle, OllamaClient};

        let OracleConfig::Llm { model, temperature, host, timeout_secs, .. } = self else {
            return Err(ChoiceError::Config("not an llm oracle configuration".into()));
        };
        let client = OllamaClient::new(host, model.clone(), *temperature, Duration::from_secs(*timeout_secs))
            .map_err(|e| ChoiceError::Config(e.to_string()))?;
        Ok(Box::new(LlmOracle::new(client).with_persona_source(self.persona_source())))
    }

    #[cfg(not(feature = "llm"))]
    fn build_llm(&self) -> ChoiceResult<Box<dyn RecommendationOracle>> {
        Err(ChoiceError::Config(
            "the llm oracle needs the `llm` feature of dmc-choice".into(),
        ))
    }
}
