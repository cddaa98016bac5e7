use dmc_core::AgentId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChoiceError {
    /// No recommendation was accepted for a trip and the fallback policy is
    /// `EXCEPTION`.
    #[error("no feasible mode for {agent}, trip {trip_index}")]
    NoFeasibleChoice {
        agent:      AgentId,
        trip_index: usize,
    },

    #[error("no modes available to {agent} for this tour")]
    EmptyModeSet { agent: AgentId },

    #[error("{0} is not in the population")]
    UnknownAgent(AgentId),

    #[error("mode choice configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ChoiceResult<T> = Result<T, ChoiceError>;

/// A failure inside a [`SelectionAuditor`][crate::SelectionAuditor].
///
/// Never changes a selection outcome; the engine logs it and moves on.
#[derive(Debug, Error)]
#[error("audit sink error: {0}")]
pub struct AuditError(#[source] Box<dyn std::error::Error + Send + Sync>);

impl AuditError {
    pub fn new(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        AuditError(err.into())
    }
}
