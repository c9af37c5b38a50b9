//! Bracket boundary value objects.
//!
//! Age and weight brackets are bounded numeric intervals with an optional
//! open upper end (`None` means "this value and above"). Both are validated
//! on construction and immutable afterwards; equality is structural.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit an age bracket is denominated in
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgeUnit {
    Months,
    Years,
}

impl AgeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeUnit::Months => "months",
            AgeUnit::Years => "years",
        }
    }
}

impl fmt::Display for AgeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgeUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "months" | "month" => Ok(AgeUnit::Months),
            "years" | "year" => Ok(AgeUnit::Years),
            other => Err(Error::UnknownAgeUnit {
                value: other.to_string(),
            }),
        }
    }
}

/// An age bracket boundary: `min_age` up to an optional `max_age`
///
/// Invariants, enforced at construction:
/// - `min_age >= 0`
/// - `max_age`, when bounded, is strictly greater than `min_age`
/// - a bracket denominated in months starts at 12 months or earlier
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AgeRange {
    min_age: f64,
    max_age: Option<f64>,
    unit: AgeUnit,
}

impl AgeRange {
    pub fn new(min_age: f64, max_age: Option<f64>, unit: AgeUnit) -> Result<Self> {
        if min_age < 0.0 {
            return Err(Error::NegativeAge);
        }
        if let Some(max) = max_age {
            if max <= min_age {
                return Err(Error::InvertedAgeBounds { min: min_age, max });
            }
        }
        if unit == AgeUnit::Months && min_age > 12.0 {
            return Err(Error::MonthsAgeAboveTwelve { min: min_age });
        }
        Ok(Self {
            min_age,
            max_age,
            unit,
        })
    }

    pub fn min_age(&self) -> f64 {
        self.min_age
    }

    pub fn max_age(&self) -> Option<f64> {
        self.max_age
    }

    pub fn unit(&self) -> AgeUnit {
        self.unit
    }

    /// True when the bracket has no upper bound
    pub fn is_open_ended(&self) -> bool {
        self.max_age.is_none()
    }
}

impl fmt::Display for AgeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max_age {
            Some(max) => write!(f, "{} to {} {}", self.min_age, max, self.unit),
            None => write!(f, "{} {} and above", self.min_age, self.unit),
        }
    }
}

/// A weight bracket boundary in kilograms
///
/// Invariants, enforced at construction:
/// - `min_weight > 0`
/// - `max_weight`, when bounded, is strictly greater than `min_weight`
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct WeightRange {
    min_weight: f64,
    max_weight: Option<f64>,
}

impl WeightRange {
    pub fn new(min_weight: f64, max_weight: Option<f64>) -> Result<Self> {
        if min_weight <= 0.0 {
            return Err(Error::NonPositiveWeight { min: min_weight });
        }
        if let Some(max) = max_weight {
            if max <= min_weight {
                return Err(Error::InvertedWeightBounds {
                    min: min_weight,
                    max,
                });
            }
        }
        Ok(Self {
            min_weight,
            max_weight,
        })
    }

    pub fn min_weight(&self) -> f64 {
        self.min_weight
    }

    pub fn max_weight(&self) -> Option<f64> {
        self.max_weight
    }

    pub fn unit(&self) -> &'static str {
        "kg"
    }

    pub fn is_open_ended(&self) -> bool {
        self.max_weight.is_none()
    }
}

impl fmt::Display for WeightRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max_weight {
            Some(max) => write!(f, "{} to {} kg", self.min_weight, max),
            None => write!(f, "{} kg and above", self.min_weight),
        }
    }
}
