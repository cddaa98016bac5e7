//! Human-readable traveller profile derived from raw attributes.
//!
//! Used by oracles that reason over socio-demographics (the rule-based
//! oracle reads the flags, the LLM oracle renders every field into its
//! prompt).  Missing attributes never fail: they render as "unknown" /
//! "Not known" and flags default to `false`.

use crate::{Agent, keys};

const NOT_KNOWN: &str = "Not known";

/// Derived view of an agent's socio-demographic attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentProfile {
    pub age:               Option<i64>,
    pub age_group:         &'static str,
    pub gender:            &'static str,
    pub income:            &'static str,
    pub has_license:       bool,
    pub car_available:     bool,
    pub employed:          bool,
    pub pt_subscription:   &'static str,
    pub canton:            String,
    pub municipality_type: String,
}

impl AgentProfile {
    pub fn from_agent(agent: &Agent) -> Self {
        let attrs = &agent.attributes;
        let age = attrs.get_i64(keys::AGE);

        let gender = match attrs.get_str(keys::SEX).map(str::trim) {
            Some("m") | Some("male") => "male",
            Some("f") | Some("female") => "female",
            _ => "unknown",
        };

        let full_pass = attrs.get_bool(keys::PT_HAS_GA).unwrap_or(false)
            || attrs.get_bool(keys::PT_HAS_VERBUND).unwrap_or(false);
        let pt_subscription = if full_pass {
            "Yes"
        } else if attrs.get_bool(keys::PT_HAS_HALBTAX).unwrap_or(false) {
            "Half-fare card (50% reduction)"
        } else {
            "No"
        };

        Self {
            age,
            age_group: age.map(age_group).unwrap_or("unknown"),
            gender,
            income: income_bracket(attrs.get_i64(keys::INCOME_CLASS)),
            has_license: attrs.get_bool(keys::HAS_LICENSE).unwrap_or(false),
            car_available: attrs.get_bool(keys::CAR_AVAIL).unwrap_or(false),
            employed: attrs.get_bool(keys::EMPLOYED).unwrap_or(false),
            pt_subscription,
            canton: attrs.get_str(keys::CANTON).unwrap_or(NOT_KNOWN).to_owned(),
            municipality_type: attrs
                .get_str(keys::MUNICIPALITY_TYPE)
                .unwrap_or(NOT_KNOWN)
                .to_owned(),
        }
    }

    /// `true` when the agent may drive: licence and a car at hand.
    pub fn can_drive(&self) -> bool {
        self.has_license && self.car_available
    }
}

/// Life-stage label for an age in years.
pub fn age_group(age: i64) -> &'static str {
    match age {
        a if a < 18 => "minor",
        a if a < 30 => "young adult",
        a if a < 50 => "middle-aged",
        a if a < 65 => "senior professional",
        _ => "retiree",
    }
}

/// Monthly household income bracket for income classes 0–8.
pub fn income_bracket(class: Option<i64>) -> &'static str {
    match class {
        Some(0) => "Less than CHF 2000",
        Some(1) => "2000 to 4000 CHF",
        Some(2) => "4001 to 6000 CHF",
        Some(3) => "6001 to 8000 CHF",
        Some(4) => "8001 to 10000 CHF",
        Some(5) => "10001 to 12000 CHF",
        Some(6) => "12001 to 14000 CHF",
        Some(7) => "14001 to 16000 CHF",
        Some(8) => "More than 16000 CHF",
        _ => "unknown",
    }
}
