// src/core/rules.rs
use crate::core::{AfError, Result};
use crate::traits::DeprivationRule;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw observation for one person in one dimension, before any cutoff is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Numeric(f64),
    Category(String),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Numeric(v) => write!(f, "{}", v),
            RawValue::Category(c) => write!(f, "'{}'", c),
        }
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Numeric(v)
    }
}

impl From<&str> for RawValue {
    fn from(c: &str) -> Self {
        RawValue::Category(c.to_string())
    }
}

/// Per-dimension deprivation cutoff, one row of an "Indicator"/"Cutoff" table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "cutoff")]
pub enum IndicatorRule {
    /// Value is already a 0/1 deprivation bit.
    Binary,
    /// Deprived if the value is strictly below the threshold.
    Below(f64),
    /// Deprived if the value equals the designated category.
    Category(String),
}

impl DeprivationRule for IndicatorRule {
    fn is_deprived(&self, value: &RawValue) -> Result<bool> {
        match (self, value) {
            (IndicatorRule::Binary, RawValue::Numeric(v)) if *v == 0.0 => Ok(false),
            (IndicatorRule::Binary, RawValue::Numeric(v)) if *v == 1.0 => Ok(true),
            (IndicatorRule::Below(z), RawValue::Numeric(v)) if v.is_finite() => Ok(*v < *z),
            (IndicatorRule::Category(c), RawValue::Category(v)) => Ok(v == c),
            (rule, value) => Err(AfError::InvalidValue(format!(
                "Value {} cannot be evaluated by rule {:?}.",
                value, rule
            ))),
        }
    }
}
