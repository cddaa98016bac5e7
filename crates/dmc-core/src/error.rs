//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `DmcError` as one
//! variant where core types can fail during construction.

use thiserror::Error;

/// The top-level error type for `dmc-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum DmcError {
    #[error("mode set is empty")]
    EmptyModeSet,

    #[error("unknown transport mode {0:?}")]
    UnknownMode(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `dmc-*` crates.
pub type DmcResult<T> = Result<T, DmcError>;
