//! Mapping free-text oracle answers onto a transport mode.
//!
//! Language models rarely answer with the bare label.  Normalisation is:
//!
//! 1. trim, lower-case, and turn spaces and dashes into underscores
//!    (`"Car passenger"` → `"car_passenger"`);
//! 2. an exact match against the allowed labels wins;
//! 3. otherwise the allowed label found earliest in the answer wins; at the
//!    same position the longer label wins, so `car_passenger` is not read
//!    as `car`.
//!
//! No match is an [`OracleError::Unmapped`] carrying the raw answer.

use dmc_core::TransportMode;

use crate::{OracleError, OracleResult};

/// Map `response` onto one of `allowed`.
pub fn normalize_response(response: &str, allowed: &[TransportMode]) -> OracleResult<TransportMode> {
    let folded: String = response
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect();

    if let Some(&mode) = allowed.iter().find(|m| m.as_str() == folded) {
        return Ok(mode);
    }

    allowed
        .iter()
        .filter_map(|&m| folded.find(m.as_str()).map(|at| (at, m)))
        .min_by_key(|&(at, m)| (at, std::cmp::Reverse(m.as_str().len())))
        .map(|(_, m)| m)
        .ok_or_else(|| OracleError::Unmapped { response: response.to_owned() })
}
