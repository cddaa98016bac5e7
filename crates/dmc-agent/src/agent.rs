//! `Agent` and `Population`.

use std::collections::HashMap;

use dmc_core::AgentId;

use crate::Attributes;

/// A traveller: opaque identity plus named attributes.
///
/// Immutable for the duration of one tour's selection.  Collaborators that
/// derive extra per-agent data (an LLM persona, say) keep it on their side,
/// keyed by [`AgentId`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
    pub id:         AgentId,
    pub attributes: Attributes,
}

impl Agent {
    /// An agent with no attributes.
    pub fn new(id: AgentId) -> Self {
        Self { id, attributes: Attributes::new() }
    }

    pub fn with_attributes(id: AgentId, attributes: Attributes) -> Self {
        Self { id, attributes }
    }
}

// ── Population ────────────────────────────────────────────────────────────────

/// An ordered collection of agents with lookup by id.
///
/// Agents keep their insertion order; ids need not be dense.
#[derive(Clone, Debug, Default)]
pub struct Population {
    agents: Vec<Agent>,
    by_id:  HashMap<AgentId, usize>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an agent.  An agent with an id already present replaces the old
    /// entry in place.
    pub fn insert(&mut self, agent: Agent) {
        match self.by_id.get(&agent.id) {
            Some(&slot) => self.agents[slot] = agent,
            None => {
                self.by_id.insert(agent.id, self.agents.len());
                self.agents.push(agent);
            }
        }
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.by_id.get(&id).map(|&slot| &self.agents[slot])
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    pub fn as_slice(&self) -> &[Agent] {
        &self.agents
    }
}

impl FromIterator<Agent> for Population {
    fn from_iter<I: IntoIterator<Item = Agent>>(iter: I) -> Self {
        let mut population = Population::new();
        for agent in iter {
            population.insert(agent);
        }
        population
    }
}
