//! Drug aggregate and drug-level value objects.
//!
//! Everything here is constructed once from validated inputs by mapping
//! code and read-only afterwards. The engine itself only needs
//! [`DosageSchedule`]; the rest carries the identity and indication data
//! the surrounding service attaches to a drug.

use crate::{AgeGroups, AgeUnit, Dose, Error, Result};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// A non-empty, trimmed drug name
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct DrugName {
    value: String,
}

impl DrugName {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyDrugName);
        }
        Ok(Self {
            value: trimmed.to_string(),
        })
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for DrugName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// A drug identification code, carried as a UUID
///
/// Parsing into a [`Uuid`] makes equality case-insensitive by construction.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct IdentificationCode {
    value: Uuid,
}

impl IdentificationCode {
    pub fn new(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyIdentificationCode);
        }
        let parsed = Uuid::parse_str(trimmed).map_err(|_| Error::InvalidIdentificationCode {
            value: trimmed.to_string(),
        })?;
        Ok(Self { value: parsed })
    }

    /// Generate a fresh code for records that arrive without one
    pub fn random() -> Self {
        Self {
            value: Uuid::new_v4(),
        }
    }

    pub fn value(&self) -> Uuid {
        self.value
    }
}

impl fmt::Display for IdentificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// An indication code in dotted numeric form, e.g. `"1.1"`
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct IndicationCode {
    value: String,
}

impl IndicationCode {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if !is_dotted_numeric(trimmed) {
            return Err(Error::InvalidIndicationCode {
                value: trimmed.to_string(),
            });
        }
        Ok(Self {
            value: trimmed.to_string(),
        })
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

// digits '.' digits, nothing else
fn is_dotted_numeric(s: &str) -> bool {
    match s.split_once('.') {
        Some((major, minor)) => {
            !major.is_empty()
                && !minor.is_empty()
                && major.chars().all(|c| c.is_ascii_digit())
                && minor.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// A treated condition name, at least 3 characters after trimming
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Condition {
    value: String,
}

impl Condition {
    const MIN_LEN: usize = 3;

    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyCondition);
        }
        if trimmed.chars().count() < Self::MIN_LEN {
            return Err(Error::ConditionTooShort {
                min_len: Self::MIN_LEN,
            });
        }
        Ok(Self {
            value: trimmed.to_string(),
        })
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A non-empty, trimmed free-text description
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Description {
    value: String,
}

impl Description {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyDescription);
        }
        Ok(Self {
            value: trimmed.to_string(),
        })
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// One approved use of a drug
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Indication {
    code: IndicationCode,
    condition: Condition,
    description: Description,
    limitations: Option<Description>,
}

impl Indication {
    pub fn new(
        code: IndicationCode,
        condition: Condition,
        description: Description,
        limitations: Option<Description>,
    ) -> Self {
        Self {
            code,
            condition,
            description,
            limitations,
        }
    }

    pub fn code(&self) -> &IndicationCode {
        &self.code
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    pub fn description(&self) -> &Description {
        &self.description
    }

    pub fn limitations(&self) -> Option<&Description> {
        self.limitations.as_ref()
    }
}

/// Administration instructions plus the age-group bracket table
///
/// Pure composition; every invariant lives in the parts.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DosageSchedule {
    instructions: Vec<Description>,
    age_groups: AgeGroups,
}

impl DosageSchedule {
    pub fn new(instructions: Vec<Description>, age_groups: AgeGroups) -> Self {
        Self {
            instructions,
            age_groups,
        }
    }

    pub fn instructions(&self) -> &[Description] {
        &self.instructions
    }

    pub fn age_groups(&self) -> &AgeGroups {
        &self.age_groups
    }

    /// Resolve the dose for a patient profile
    ///
    /// Selects the age bracket, then resolves the weight bracket within it.
    pub fn resolve_dose(&self, age: f64, unit: AgeUnit, weight: f64) -> Result<&Dose> {
        self.age_groups
            .bracket_for(age, unit, weight)?
            .dose_for_weight(weight)
    }
}

/// The drug aggregate: identity, indications, and dosing schedule
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Drug {
    name: DrugName,
    identification_code: IdentificationCode,
    indications: Vec<Indication>,
    schedule: DosageSchedule,
}

impl Drug {
    pub fn new(
        name: DrugName,
        identification_code: IdentificationCode,
        indications: Vec<Indication>,
        schedule: DosageSchedule,
    ) -> Self {
        Self {
            name,
            identification_code,
            indications,
            schedule,
        }
    }

    pub fn name(&self) -> &DrugName {
        &self.name
    }

    pub fn identification_code(&self) -> &IdentificationCode {
        &self.identification_code
    }

    pub fn indications(&self) -> &[Indication] {
        &self.indications
    }

    pub fn schedule(&self) -> &DosageSchedule {
        &self.schedule
    }

    pub fn resolve_dose(&self, age: f64, unit: AgeUnit, weight: f64) -> Result<&Dose> {
        self.schedule.resolve_dose(age, unit, weight)
    }
}
