//! Typed, ordered attribute maps.
//!
//! Attribute maps come from population files where the same field may be
//! stored as `true`, `"true"`, `1`, or `"yes"` depending on the producer, so
//! the accessors on [`AttributeValue`] are deliberately lenient.

use std::collections::BTreeMap;
use std::fmt;

/// Well-known attribute keys read by the bundled oracles and availability
/// rules.
pub mod keys {
    pub const AGE:               &str = "age";
    pub const SEX:               &str = "sex";
    pub const INCOME_CLASS:      &str = "income_class";
    pub const HAS_LICENSE:       &str = "has_license";
    pub const CAR_AVAIL:         &str = "car_avail";
    pub const PT_HAS_GA:         &str = "pt_has_ga";
    pub const PT_HAS_VERBUND:    &str = "pt_has_verbund";
    pub const PT_HAS_HALBTAX:    &str = "pt_has_halbtax";
    pub const EMPLOYED:          &str = "employed";
    pub const MUNICIPALITY_TYPE: &str = "municipality_type";
    pub const CANTON:            &str = "canton";
    pub const PERSONA:           &str = "persona";
}

// ── AttributeValue ────────────────────────────────────────────────────────────

/// One attribute value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl AttributeValue {
    /// Interpret as a boolean.  Text accepts `true/yes/1` and `false/no/0`
    /// (case-insensitive); numbers are `true` when non-zero.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            AttributeValue::Int(i) => Some(*i != 0),
            AttributeValue::Float(f) => Some(*f != 0.0),
            AttributeValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
        }
    }

    /// Interpret as an integer.  Floats are truncated; text is parsed.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttributeValue::Bool(_) => None,
            AttributeValue::Int(i) => Some(*i),
            AttributeValue::Float(f) if f.is_finite() => Some(*f as i64),
            AttributeValue::Float(_) => None,
            AttributeValue::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Bool(_) => None,
            AttributeValue::Int(i) => Some(*i as f64),
            AttributeValue::Float(f) => Some(*f),
            AttributeValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Borrow the text of a `Text` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(b) => write!(f, "{b}"),
            AttributeValue::Int(i) => write!(f, "{i}"),
            AttributeValue::Float(x) => write!(f, "{x}"),
            AttributeValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Bool(v)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Int(v)
    }
}

impl From<i32> for AttributeValue {
    fn from(v: i32) -> Self {
        AttributeValue::Int(v as i64)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::Text(v.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::Text(v)
    }
}

// ── Attributes ────────────────────────────────────────────────────────────────

/// Named attributes of one agent, iterated in key order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attributes(BTreeMap<String, AttributeValue>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an attribute, returning the previous value.
    pub fn insert(
        &mut self,
        key:   impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(AttributeValue::as_bool)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(AttributeValue::as_i64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(AttributeValue::as_f64)
    }

    /// Text of a `Text` attribute; `None` for missing or non-text values.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(AttributeValue::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}
