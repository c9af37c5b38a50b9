//! Error types for the posology_core library.

use crate::ranges::AgeUnit;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for posology_core operations
///
/// Every variant is a permanent validation or lookup failure; nothing here
/// is retryable. A resolution miss is a legitimate business outcome, not a
/// fault.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Age range with a negative lower bound
    #[error("Invalid age range: age cannot be negative")]
    NegativeAge,

    /// Age range whose upper bound does not exceed its lower bound
    #[error("Invalid age range: maximum age ({max}) must be greater than minimum age ({min})")]
    InvertedAgeBounds { min: f64, max: f64 },

    /// Month-denominated age range starting past the first year
    #[error("Invalid age range: age in months ({min}) cannot be greater than 12")]
    MonthsAgeAboveTwelve { min: f64 },

    /// Weight range with a non-positive lower bound
    #[error("Invalid weight range: weight ({min}) must be greater than 0")]
    NonPositiveWeight { min: f64 },

    /// Weight range whose upper bound does not exceed its lower bound
    #[error("Invalid weight range: maximum weight ({max}) must be greater than minimum weight ({min})")]
    InvertedWeightBounds { min: f64, max: f64 },

    /// Dose text that is empty after trimming
    #[error("Invalid dosage: dosage value cannot be empty")]
    EmptyDose,

    /// Dose text with no mass-unit token
    #[error("Invalid dosage: dosage value ({value}) must include unit (mg or g)")]
    DoseMissingUnit { value: String },

    /// Age bracket constructed without any weight brackets
    #[error("At least one weight-based dosage must be provided")]
    EmptyWeightBrackets,

    /// Age-group collection constructed without any age brackets
    #[error("At least one age-based dosage must be provided")]
    EmptyAgeBrackets,

    /// No weight bracket contains the queried weight
    #[error("Dosage not found: no dosage found for weight {weight} kg in age range {age_range}")]
    NoDoseForWeight { weight: f64, age_range: String },

    /// No age bracket applies to the queried patient profile
    #[error("Dosage not found: no dosage found for age {age} {unit} and weight {weight} kg")]
    NoDoseForPatient {
        age: f64,
        unit: AgeUnit,
        weight: f64,
    },

    /// Age unit string that is neither "months" nor "years"
    #[error("Unknown age unit ({value}); expected \"months\" or \"years\"")]
    UnknownAgeUnit { value: String },

    /// Drug name that is empty after trimming
    #[error("Drug name cannot be empty")]
    EmptyDrugName,

    /// Identification code that is empty after trimming
    #[error("Identification code cannot be empty")]
    EmptyIdentificationCode,

    /// Identification code that does not parse as a UUID
    #[error("Identification code ({value}) is not a valid UUID")]
    InvalidIdentificationCode { value: String },

    /// Indication code not in dotted numeric form
    #[error("Indication code ({value}) must be in format X.X")]
    InvalidIndicationCode { value: String },

    /// Condition that is empty after trimming
    #[error("Condition cannot be empty")]
    EmptyCondition,

    /// Condition shorter than the minimum length
    #[error("Condition must be at least {min_len} characters")]
    ConditionTooShort { min_len: usize },

    /// Description that is empty after trimming
    #[error("Description cannot be empty")]
    EmptyDescription,

    /// Formulary lookup miss
    #[error("Drug not found: {name}")]
    DrugNotFound { name: String },
}
