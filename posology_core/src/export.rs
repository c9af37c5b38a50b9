//! CSV export of a drug's bracket table.

use crate::{Drug, Result};
use std::fs::File;
use std::path::Path;

/// One flattened (age bracket, weight bracket) row
#[derive(Debug, serde::Serialize)]
struct ScheduleRow {
    age_min: f64,
    age_max: Option<f64>,
    age_unit: String,
    weight_min: f64,
    weight_max: Option<f64>,
    dose: String,
}

/// Write the drug's full bracket table as CSV
///
/// One row per weight bracket, in storage order; open upper bounds come out
/// as empty cells. Returns the number of rows written.
pub fn write_schedule_csv(drug: &Drug, path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);

    let mut rows = 0;
    for bracket in drug.schedule().age_groups().brackets() {
        let age_range = bracket.age_range();
        for (weight_range, dose) in bracket.weight_doses() {
            writer.serialize(ScheduleRow {
                age_min: age_range.min_age(),
                age_max: age_range.max_age(),
                age_unit: age_range.unit().to_string(),
                weight_min: weight_range.min_weight(),
                weight_max: weight_range.max_weight(),
                dose: dose.value().to_string(),
            })?;
            rows += 1;
        }
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("wrote {} schedule rows for {} to {:?}", rows, drug.name(), path);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulary::sample_drug;

    #[test]
    fn test_export_writes_one_row_per_weight_bracket() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("schedule.csv");

        let rows = write_schedule_csv(sample_drug(), &csv_path).unwrap();
        assert_eq!(rows, 7);

        let contents = std::fs::read_to_string(&csv_path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "age_min,age_max,age_unit,weight_min,weight_max,dose"
        );
        assert_eq!(lines.count(), 7);
    }

    #[test]
    fn test_open_bounds_serialize_as_empty_cells() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("schedule.csv");

        write_schedule_csv(sample_drug(), &csv_path).unwrap();
        let contents = std::fs::read_to_string(&csv_path).unwrap();

        // the open-ended adult bracket: no age max, no weight max
        assert!(contents.lines().any(|l| l == "17.0,,years,40.0,,875 mg"));
    }

    #[test]
    fn test_export_creates_parent_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("nested").join("out").join("schedule.csv");

        write_schedule_csv(sample_drug(), &csv_path).unwrap();
        assert!(csv_path.exists());
    }
}
