//! Fluent builder for constructing an [`Agent`].
//!
//! # Usage
//!
//! ```rust
//! use dmc_agent::{AgentBuilder, keys};
//! use dmc_core::AgentId;
//!
//! let agent = AgentBuilder::new(AgentId(7))
//!     .attribute(keys::AGE, 34)
//!     .attribute(keys::HAS_LICENSE, true)
//!     .attribute(keys::CANTON, "Zurich")
//!     .build();
//!
//! assert_eq!(agent.attributes.get_i64(keys::AGE), Some(34));
//! ```

use dmc_core::AgentId;

use crate::{Agent, AttributeValue, Attributes};

/// Fluent builder for [`Agent`].
pub struct AgentBuilder {
    id:         AgentId,
    attributes: Attributes,
}

impl AgentBuilder {
    pub fn new(id: AgentId) -> Self {
        Self { id, attributes: Attributes::new() }
    }

    /// Set one attribute.  Setting the same key twice keeps the last value.
    pub fn attribute(mut self, key: &str, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    pub fn build(self) -> Agent {
        Agent::with_attributes(self.id, self.attributes)
    }
}
