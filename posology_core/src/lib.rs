#![forbid(unsafe_code)]

//! Core domain model and business logic for the Posology dosing system.
//!
//! This crate provides:
//! - Domain value objects (age/weight brackets, doses, drug identity)
//! - The dosage resolution engine (age groups → weight brackets → dose)
//! - Record mapping between persisted documents and domain objects
//! - Formulary loading and schedule export

pub mod error;
pub mod ranges;
pub mod dose;
pub mod bracket;
pub mod groups;
pub mod drug;
pub mod record;
pub mod formulary;
pub mod export;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use ranges::{AgeRange, AgeUnit, WeightRange};
pub use dose::Dose;
pub use bracket::AgeBracket;
pub use groups::AgeGroups;
pub use drug::{
    Condition, Description, DosageSchedule, Drug, DrugName, IdentificationCode, Indication,
    IndicationCode,
};
pub use record::{
    AgeBracketRecord, DosageRecord, DrugRecord, IndicationRecord, WeightDoseRecord,
};
pub use formulary::{add_record, read_record, sample_drug, Formulary};
pub use export::write_schedule_csv;
pub use config::Config;
