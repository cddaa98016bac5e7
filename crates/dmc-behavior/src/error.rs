use thiserror::Error;

/// Why an oracle could not produce a usable recommendation.
///
/// The choice engine does not distinguish between variants: every one of
/// them means "no usable recommendation for this trip".
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("no valid modes to choose from")]
    NoValidModes,

    #[error("response {response:?} does not name any allowed mode")]
    Unmapped { response: String },

    #[error("oracle request timed out")]
    Timeout,

    #[error("oracle transport error: {0}")]
    Transport(String),

    #[error("oracle configuration error: {0}")]
    Config(String),
}

pub type OracleResult<T> = Result<T, OracleError>;
