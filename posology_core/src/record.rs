//! Persisted drug record shape and domain mapping.
//!
//! Records mirror the document layout the surrounding service stores and
//! scrapes into. They deserialize freely; the only way to turn one into a
//! [`Drug`] is `TryFrom`, which funnels every field through the validating
//! domain constructors. The reverse mapping reads the accessors back out
//! and always succeeds.

use crate::{
    AgeBracket, AgeGroups, AgeRange, AgeUnit, Condition, Description, DosageSchedule, Dose, Drug,
    DrugName, IdentificationCode, Indication, IndicationCode, Result, WeightRange,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One weight bracket row: bounds in kg plus the dose text
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeightDoseRecord {
    pub min_weight: f64,
    pub max_weight: Option<f64>,
    pub dose: String,
}

/// One age bracket with its weight bracket rows
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AgeBracketRecord {
    pub min_age: f64,
    pub max_age: Option<f64>,
    pub age_unit: AgeUnit,
    pub doses: Vec<WeightDoseRecord>,
}

/// Dosage section: instruction texts plus the bracket table
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DosageRecord {
    #[serde(default)]
    pub instructions: Vec<String>,
    pub age_groups: Vec<AgeBracketRecord>,
}

/// One indication entry
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct IndicationRecord {
    pub code: String,
    pub condition: String,
    pub description: String,
    #[serde(default)]
    pub limitations: Option<String>,
}

/// A complete persisted drug record
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DrugRecord {
    pub name: String,
    /// Absent in freshly scraped records; a code is generated on mapping
    #[serde(default)]
    pub identification_code: Option<String>,
    #[serde(default)]
    pub indications: Vec<IndicationRecord>,
    pub dosage: DosageRecord,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<&AgeBracketRecord> for AgeBracket {
    type Error = crate::Error;

    fn try_from(record: &AgeBracketRecord) -> Result<Self> {
        let age_range = AgeRange::new(record.min_age, record.max_age, record.age_unit)?;
        let mut doses = Vec::with_capacity(record.doses.len());
        for row in &record.doses {
            let range = WeightRange::new(row.min_weight, row.max_weight)?;
            let dose = Dose::new(row.dose.as_str())?;
            doses.push((range, dose));
        }
        AgeBracket::new(age_range, doses)
    }
}

impl TryFrom<&DrugRecord> for Drug {
    type Error = crate::Error;

    fn try_from(record: &DrugRecord) -> Result<Self> {
        let name = DrugName::new(record.name.as_str())?;

        let identification_code = match record.identification_code.as_deref() {
            Some(code) => IdentificationCode::new(code)?,
            None => {
                let code = IdentificationCode::random();
                tracing::info!(
                    "record for {} has no identification code, generated {}",
                    name,
                    code
                );
                code
            }
        };

        let mut indications = Vec::with_capacity(record.indications.len());
        for ind in &record.indications {
            let limitations = match ind.limitations.as_deref() {
                Some(text) => Some(Description::new(text)?),
                None => None,
            };
            indications.push(Indication::new(
                IndicationCode::new(ind.code.as_str())?,
                Condition::new(ind.condition.as_str())?,
                Description::new(ind.description.as_str())?,
                limitations,
            ));
        }

        let mut instructions = Vec::with_capacity(record.dosage.instructions.len());
        for text in &record.dosage.instructions {
            instructions.push(Description::new(text.as_str())?);
        }

        let mut brackets = Vec::with_capacity(record.dosage.age_groups.len());
        for bracket in &record.dosage.age_groups {
            brackets.push(AgeBracket::try_from(bracket)?);
        }
        let age_groups = AgeGroups::new(brackets)?;

        Ok(Drug::new(
            name,
            identification_code,
            indications,
            DosageSchedule::new(instructions, age_groups),
        ))
    }
}

impl From<&Drug> for DrugRecord {
    fn from(drug: &Drug) -> Self {
        let age_groups = drug
            .schedule()
            .age_groups()
            .brackets()
            .iter()
            .map(|bracket| AgeBracketRecord {
                min_age: bracket.age_range().min_age(),
                max_age: bracket.age_range().max_age(),
                age_unit: bracket.age_range().unit(),
                doses: bracket
                    .weight_doses()
                    .iter()
                    .map(|(range, dose)| WeightDoseRecord {
                        min_weight: range.min_weight(),
                        max_weight: range.max_weight(),
                        dose: dose.value().to_string(),
                    })
                    .collect(),
            })
            .collect();

        DrugRecord {
            name: drug.name().value().to_string(),
            identification_code: Some(drug.identification_code().to_string()),
            indications: drug
                .indications()
                .iter()
                .map(|ind| IndicationRecord {
                    code: ind.code().value().to_string(),
                    condition: ind.condition().value().to_string(),
                    description: ind.description().value().to_string(),
                    limitations: ind.limitations().map(|l| l.value().to_string()),
                })
                .collect(),
            dosage: DosageRecord {
                instructions: drug
                    .schedule()
                    .instructions()
                    .iter()
                    .map(|d| d.value().to_string())
                    .collect(),
                age_groups,
            },
            updated_at: Some(Utc::now()),
        }
    }
}
