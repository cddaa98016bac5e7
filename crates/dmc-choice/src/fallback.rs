//! What happens when no recommendation is accepted for a trip.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ChoiceError;

/// Recovery policy applied when a trip ends without an accepted candidate.
///
/// | Policy           | Effect                                                    |
/// |------------------|-----------------------------------------------------------|
/// | `INITIAL_CHOICE` | the failing trip keeps its initial mode; the tour goes on |
/// | `IGNORE_AGENT`   | the whole tour reverts to its initial modes               |
/// | `EXCEPTION`      | `select` fails with `ChoiceError::NoFeasibleChoice`       |
///
/// Fixed for the whole run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FallbackBehaviour {
    InitialChoice,
    IgnoreAgent,
    #[default]
    Exception,
}

impl FallbackBehaviour {
    pub fn as_str(self) -> &'static str {
        match self {
            FallbackBehaviour::InitialChoice => "INITIAL_CHOICE",
            FallbackBehaviour::IgnoreAgent => "IGNORE_AGENT",
            FallbackBehaviour::Exception => "EXCEPTION",
        }
    }
}

impl fmt::Display for FallbackBehaviour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FallbackBehaviour {
    type Err = ChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INITIAL_CHOICE" => Ok(FallbackBehaviour::InitialChoice),
            "IGNORE_AGENT" => Ok(FallbackBehaviour::IgnoreAgent),
            "EXCEPTION" => Ok(FallbackBehaviour::Exception),
            other => Err(ChoiceError::Config(format!("unknown fallback behaviour {other:?}"))),
        }
    }
}
