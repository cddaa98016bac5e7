//! Language-model-backed oracle.
//!
//! [`LlmOracle`] owns the prompt logic and persona handling; the actual
//! model call goes through a [`ChatTransport`], so tests run against a
//! scripted transport and production runs against
//! [`OllamaClient`][ollama::OllamaClient] (feature `llm`).

pub mod persona;
pub mod prompt;

#[cfg(feature = "llm")]
pub mod ollama;

use std::collections::HashMap;
use std::sync::Mutex;

use dmc_agent::{Agent, AgentProfile, keys};
use dmc_core::{AgentId, AgentRng, TransportMode};

use crate::{OracleError, OracleResult, RecommendationOracle, TripContext, normalize_response};

// ── ChatTransport ─────────────────────────────────────────────────────────────

/// One request/response exchange with a chat model.
///
/// Implementations return the raw reply text.  Timeouts are reported as
/// [`OracleError::Timeout`], anything else that goes wrong on the wire as
/// [`OracleError::Transport`].
pub trait ChatTransport: Send + Sync {
    fn chat(&self, system: &str, user: &str) -> OracleResult<String>;
}

impl<T: ChatTransport + ?Sized> ChatTransport for Box<T> {
    fn chat(&self, system: &str, user: &str) -> OracleResult<String> {
        (**self).chat(system, user)
    }
}

// ── PersonaSource ─────────────────────────────────────────────────────────────

/// Where a persona comes from when the agent carries no `persona` attribute.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PersonaSource {
    /// Ask the model for a one-line persona built from the agent's profile.
    #[default]
    Generate,
    /// Draw one from [`persona::STOCK_PERSONAS`] with the agent's RNG.
    Sample,
}

// ── LlmOracle ─────────────────────────────────────────────────────────────────

/// Oracle that asks a chat model which mode the traveller would take.
///
/// Per proposal:
///
/// 1. a single valid mode is returned as-is, without a model call;
/// 2. the agent's persona is resolved: `persona` attribute, else cache,
///    else generated or sampled per [`PersonaSource`] and cached;
/// 3. the trip prompt quotes the scenario, the profile, the persona, the
///    trips already decided today, and estimated durations for every valid
///    mode;
/// 4. the reply goes through [`normalize_response`] against the valid set.
///
/// Resolved personas are cached per agent, so every trip of a tour sees the
/// same one.  The cache holds one entry per agent ever seen and is never
/// evicted; call [`clear_personas`][Self::clear_personas] between simulated
/// days if personas should be redrawn.
pub struct LlmOracle<T> {
    transport:      T,
    persona_source: PersonaSource,
    personas:       Mutex<HashMap<AgentId, String>>,
}

impl<T: ChatTransport> LlmOracle<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            persona_source: PersonaSource::default(),
            personas:       Mutex::new(HashMap::new()),
        }
    }

    pub fn with_persona_source(mut self, source: PersonaSource) -> Self {
        self.persona_source = source;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Cached persona for `agent`, if one has been resolved already.
    pub fn cached_persona(&self, agent: AgentId) -> Option<String> {
        self.personas
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&agent)
            .cloned()
    }

    /// Forget every cached persona.  Returns how many were dropped.
    pub fn clear_personas(&self) -> usize {
        let mut cache = self.personas.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let dropped = cache.len();
        cache.clear();
        dropped
    }

    fn resolve_persona(
        &self,
        agent:   &Agent,
        profile: &AgentProfile,
        rng:     &mut AgentRng,
    ) -> OracleResult<String> {
        if let Some(attr) = agent.attributes.get_str(keys::PERSONA) {
            let attr = attr.trim();
            if !attr.is_empty() {
                return Ok(attr.to_owned());
            }
        }
        if let Some(cached) = self.cached_persona(agent.id) {
            return Ok(cached);
        }

        let persona = match self.persona_source {
            PersonaSource::Generate => {
                let reply = self
                    .transport
                    .chat(&prompt::persona_system_prompt(), &prompt::persona_prompt(profile))?;
                let line = reply.lines().map(str::trim).find(|l| !l.is_empty());
                match line {
                    Some(line) => line.trim_matches('"').to_owned(),
                    None => persona::sample(rng).to_owned(),
                }
            }
            PersonaSource::Sample => persona::sample(rng).to_owned(),
        };
        log::debug!("{}: persona {:?}", agent.id, persona);

        let mut cache = self.personas.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(cache.entry(agent.id).or_insert(persona).clone())
    }
}

impl<T: ChatTransport> RecommendationOracle for LlmOracle<T> {
    fn propose(&self, ctx: &TripContext<'_>, rng: &mut AgentRng) -> OracleResult<TransportMode> {
        let valid = ctx.valid_modes;
        let first = valid.first().ok_or(OracleError::NoValidModes)?;
        if valid.len() == 1 {
            return Ok(first);
        }

        let profile = AgentProfile::from_agent(ctx.agent);
        let persona = self.resolve_persona(ctx.agent, &profile, rng)?;
        let estimates = ctx.estimate_valid_modes();

        let system = prompt::mode_system_prompt(valid.as_slice());
        let user = prompt::trip_prompt(ctx, &profile, &persona, &estimates);
        let reply = self.transport.chat(&system, &user)?;
        log::debug!("{} trip {}: model replied {:?}", ctx.agent.id, ctx.trip.index, reply);

        normalize_response(&reply, valid.as_slice())
    }

    fn name(&self) -> &str {
        "llm"
    }
}
