//! Formulary: the set of drugs available for resolution.
//!
//! Records live as JSON files in a directory, one drug per file, written by
//! the ingestion side of the service. Loading is lenient (malformed files
//! are skipped with a warning); writing is atomic (exclusive lock on a temp
//! file, then rename). A built-in sample drug backs the CLI when no records
//! exist yet.

use crate::{DrugRecord, Drug, Result};
use fs2::FileExt;
use once_cell::sync::Lazy;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Cached built-in sample drug - built once and reused
static SAMPLE_DRUG: Lazy<Drug> = Lazy::new(|| {
    Drug::try_from(&sample_record()).expect("built-in sample record is valid")
});

/// Get a reference to the built-in sample drug
pub fn sample_drug() -> &'static Drug {
    &SAMPLE_DRUG
}

/// The built-in sample record (a pediatric amoxicillin-style schedule)
fn sample_record() -> DrugRecord {
    use crate::record::{AgeBracketRecord, DosageRecord, IndicationRecord, WeightDoseRecord};
    use crate::AgeUnit;

    DrugRecord {
        name: "Amoxicillin".into(),
        identification_code: Some("6f2c63a4-6ee5-4d60-9d4d-2c1b0a6c1f3e".into()),
        indications: vec![IndicationRecord {
            code: "1.1".into(),
            condition: "Acute otitis media".into(),
            description:
                "Treatment of acute otitis media caused by susceptible isolates of Streptococcus pneumoniae."
                    .into(),
            limitations: Some("Not for patients with penicillin hypersensitivity.".into()),
        }],
        dosage: DosageRecord {
            instructions: vec![
                "Administer at the start of a meal to reduce gastric upset.".into(),
                "Complete the full prescribed course even if symptoms improve.".into(),
            ],
            age_groups: vec![
                AgeBracketRecord {
                    min_age: 0.0,
                    max_age: Some(12.0),
                    age_unit: AgeUnit::Months,
                    doses: vec![
                        WeightDoseRecord {
                            min_weight: 3.0,
                            max_weight: Some(5.0),
                            dose: "125 mg".into(),
                        },
                        WeightDoseRecord {
                            min_weight: 5.0,
                            max_weight: Some(10.0),
                            dose: "250 mg".into(),
                        },
                    ],
                },
                AgeBracketRecord {
                    min_age: 0.0,
                    max_age: Some(12.0),
                    age_unit: AgeUnit::Years,
                    doses: vec![
                        WeightDoseRecord {
                            min_weight: 10.0,
                            max_weight: Some(20.0),
                            dose: "250 mg".into(),
                        },
                        WeightDoseRecord {
                            min_weight: 20.0,
                            max_weight: None,
                            dose: "500 mg".into(),
                        },
                    ],
                },
                AgeBracketRecord {
                    min_age: 12.0,
                    max_age: Some(17.0),
                    age_unit: AgeUnit::Years,
                    doses: vec![
                        WeightDoseRecord {
                            min_weight: 30.0,
                            max_weight: Some(50.0),
                            dose: "500 mg".into(),
                        },
                        WeightDoseRecord {
                            min_weight: 50.0,
                            max_weight: None,
                            dose: "875 mg".into(),
                        },
                    ],
                },
                AgeBracketRecord {
                    min_age: 17.0,
                    max_age: None,
                    age_unit: AgeUnit::Years,
                    doses: vec![WeightDoseRecord {
                        min_weight: 40.0,
                        max_weight: None,
                        dose: "875 mg".into(),
                    }],
                },
            ],
        },
        updated_at: None,
    }
}

/// In-memory formulary, loaded from a records directory
#[derive(Clone, Debug)]
pub struct Formulary {
    drugs: Vec<Drug>,
}

impl Formulary {
    /// Load every `*.json` record under `dir`
    ///
    /// Files that fail to read, parse, or validate are skipped with a
    /// warning; one bad record never poisons the formulary. The built-in
    /// sample drug is appended unless a record shadows its name.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut drugs = Vec::new();

        if dir.exists() {
            let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.extension().map_or(false, |ext| ext == "json"))
                .collect();
            paths.sort();

            for path in paths {
                match read_record(&path) {
                    Ok(drug) => {
                        tracing::debug!("loaded record {} from {:?}", drug.name(), path);
                        drugs.push(drug);
                    }
                    Err(e) => {
                        tracing::warn!("skipping record {:?}: {}", path, e);
                    }
                }
            }
        } else {
            tracing::debug!("no records directory at {:?}", dir);
        }

        let sample = sample_drug();
        let shadowed = drugs
            .iter()
            .any(|d| d.name().value().eq_ignore_ascii_case(sample.name().value()));
        if !shadowed {
            drugs.push(sample.clone());
        }

        tracing::info!("formulary loaded with {} drugs", drugs.len());
        Ok(Self { drugs })
    }

    /// Case-insensitive name lookup; first match in load order wins
    pub fn get(&self, name: &str) -> Option<&Drug> {
        self.drugs
            .iter()
            .find(|d| d.name().value().eq_ignore_ascii_case(name.trim()))
    }

    pub fn drugs(&self) -> &[Drug] {
        &self.drugs
    }

    /// Report cross-record problems the constructors cannot see
    ///
    /// Returns a list of findings, or empty Vec if clean.
    pub fn validate(&self) -> Vec<String> {
        let mut findings = Vec::new();
        for (i, drug) in self.drugs.iter().enumerate() {
            let name = drug.name().value();
            if self.drugs[..i]
                .iter()
                .any(|d| d.name().value().eq_ignore_ascii_case(name))
            {
                findings.push(format!("Duplicate drug name '{}'", name));
            }
        }
        findings
    }
}

/// Read and validate one record file
pub fn read_record(path: &Path) -> Result<Drug> {
    let contents = std::fs::read_to_string(path)?;
    let record: DrugRecord = serde_json::from_str(&contents)?;
    Drug::try_from(&record)
}

/// Validate a record and install it into the records directory
///
/// Writes atomically: serialized to a locked temp file in the target
/// directory, synced, then renamed into place. Returns the record path.
pub fn add_record(dir: &Path, record: &DrugRecord) -> Result<PathBuf> {
    let drug = Drug::try_from(record)?;

    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.json", file_stem(drug.name().value())));

    let temp = NamedTempFile::new_in(dir)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        let contents = serde_json::to_string_pretty(record)?;
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;
    temp.persist(&path).map_err(|e| crate::Error::Io(e.error))?;

    tracing::info!("installed record for {} at {:?}", drug.name(), path);
    Ok(path)
}

// lowercase alphanumeric file stem; everything else collapses to '_'
fn file_stem(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AgeUnit;

    #[test]
    fn test_sample_drug_resolves() {
        let drug = sample_drug();
        assert_eq!(
            drug.resolve_dose(6.0, AgeUnit::Years, 15.0).unwrap().value(),
            "250 mg"
        );
        assert_eq!(
            drug.resolve_dose(6.0, AgeUnit::Months, 4.0).unwrap().value(),
            "125 mg"
        );
        assert_eq!(
            drug.resolve_dose(40.0, AgeUnit::Years, 80.0).unwrap().value(),
            "875 mg"
        );
    }

    #[test]
    fn test_load_missing_directory_yields_sample_only() {
        let temp_dir = tempfile::tempdir().unwrap();
        let formulary = Formulary::load(&temp_dir.path().join("nonexistent")).unwrap();
        assert_eq!(formulary.drugs().len(), 1);
        assert!(formulary.get("amoxicillin").is_some());
    }

    #[test]
    fn test_load_skips_malformed_records() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path();

        add_record(dir, &DrugRecord::from(&valid_drug("Cefalexin"))).unwrap();
        std::fs::write(dir.join("broken.json"), "{ not json").unwrap();

        let formulary = Formulary::load(dir).unwrap();
        assert!(formulary.get("Cefalexin").is_some());
        // sample + the one valid record
        assert_eq!(formulary.drugs().len(), 2);
    }

    #[test]
    fn test_get_is_case_insensitive() {
        let formulary = Formulary::load(Path::new("/nonexistent")).unwrap();
        assert!(formulary.get("AMOXICILLIN").is_some());
        assert!(formulary.get(" amoxicillin ").is_some());
        assert!(formulary.get("ibuprofen").is_none());
    }

    #[test]
    fn test_record_shadows_builtin_sample() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path();

        add_record(dir, &DrugRecord::from(&valid_drug("Amoxicillin"))).unwrap();

        let formulary = Formulary::load(dir).unwrap();
        assert_eq!(formulary.drugs().len(), 1);
        assert!(formulary.validate().is_empty());
    }

    #[test]
    fn test_add_record_round_trips() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path();

        let path = add_record(dir, &DrugRecord::from(&valid_drug("Cefalexin"))).unwrap();
        assert!(path.exists());
        assert_eq!(path.file_name().unwrap(), "cefalexin.json");

        let drug = read_record(&path).unwrap();
        assert_eq!(drug.name().value(), "Cefalexin");

        // no stray temp files remain
        let extras: Vec<_> = std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "cefalexin.json")
            .collect();
        assert!(extras.is_empty(), "unexpected files: {:?}", extras);
    }

    #[test]
    fn test_add_record_rejects_invalid() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut record = DrugRecord::from(&valid_drug("Cefalexin"));
        record.dosage.age_groups.clear();
        assert!(add_record(temp_dir.path(), &record).is_err());
    }

    #[test]
    fn test_validate_reports_duplicate_names() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path();

        let drug = valid_drug("Cefalexin");
        add_record(dir, &DrugRecord::from(&drug)).unwrap();
        // same name under a different file name
        let mut record = DrugRecord::from(&drug);
        record.name = "CEFALEXIN".into();
        std::fs::write(
            dir.join("cefalexin_dup.json"),
            serde_json::to_string(&record).unwrap(),
        )
        .unwrap();

        let formulary = Formulary::load(dir).unwrap();
        let findings = formulary.validate();
        assert_eq!(findings.len(), 1);
        assert!(findings[0].contains("Duplicate drug name"));
    }

    fn valid_drug(name: &str) -> Drug {
        use crate::{
            AgeBracket, AgeGroups, AgeRange, Description, DosageSchedule, Dose, DrugName,
            IdentificationCode, WeightRange,
        };

        Drug::new(
            DrugName::new(name).unwrap(),
            IdentificationCode::random(),
            vec![],
            DosageSchedule::new(
                vec![Description::new("Take with water.").unwrap()],
                AgeGroups::new(vec![AgeBracket::new(
                    AgeRange::new(0.0, Some(18.0), AgeUnit::Years).unwrap(),
                    vec![(
                        WeightRange::new(10.0, None).unwrap(),
                        Dose::new("250 mg").unwrap(),
                    )],
                )
                .unwrap()])
                .unwrap(),
            ),
        )
    }
}
