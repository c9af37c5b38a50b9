//! Weight-bracketed dosing rules under a single age bracket.

use crate::{AgeRange, Dose, Error, Result, WeightRange};
use serde::Serialize;

/// One age bracket with its weight-bracketed dose table
///
/// The table is an ordered list of `(WeightRange, Dose)` pairs keyed by
/// value, in insertion order. Brackets are not checked for overlap: when two
/// brackets both contain a weight, the first in stored order wins.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AgeBracket {
    age_range: AgeRange,
    doses: Vec<(WeightRange, Dose)>,
}

impl AgeBracket {
    /// Construct from an age range and its weight bracket table
    ///
    /// Fails when the table is empty.
    pub fn new(age_range: AgeRange, doses: Vec<(WeightRange, Dose)>) -> Result<Self> {
        if doses.is_empty() {
            return Err(Error::EmptyWeightBrackets);
        }
        Ok(Self { age_range, doses })
    }

    pub fn age_range(&self) -> &AgeRange {
        &self.age_range
    }

    /// Resolve the dose for a weight in kilograms
    ///
    /// Containment is inclusive on both ends: `weight >= min` and, when the
    /// bracket is bounded, `weight <= max`. An open-ended bracket only
    /// checks the lower bound. First match in stored order wins.
    pub fn dose_for_weight(&self, weight: f64) -> Result<&Dose> {
        for (range, dose) in &self.doses {
            if weight < range.min_weight() {
                continue;
            }
            match range.max_weight() {
                None => return Ok(dose),
                Some(max) if weight <= max => return Ok(dose),
                Some(_) => {}
            }
        }
        Err(Error::NoDoseForWeight {
            weight,
            age_range: self.age_range.to_string(),
        })
    }

    /// Defensive copy of the weight bracket table in stored order
    pub fn weight_doses(&self) -> Vec<(WeightRange, Dose)> {
        self.doses.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AgeUnit;

    fn bracket() -> AgeBracket {
        AgeBracket::new(
            AgeRange::new(0.0, Some(12.0), AgeUnit::Years).unwrap(),
            vec![(
                WeightRange::new(5.0, Some(10.0)).unwrap(),
                Dose::new("300 mg").unwrap(),
            )],
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_empty_table() {
        let err = AgeBracket::new(
            AgeRange::new(0.0, Some(12.0), AgeUnit::Years).unwrap(),
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, Error::EmptyWeightBrackets));
    }

    #[test]
    fn test_weight_containment_inclusive_both_ends() {
        let bracket = bracket();
        assert_eq!(bracket.dose_for_weight(5.0).unwrap().value(), "300 mg");
        assert_eq!(bracket.dose_for_weight(7.0).unwrap().value(), "300 mg");
        assert_eq!(bracket.dose_for_weight(10.0).unwrap().value(), "300 mg");
    }

    #[test]
    fn test_weight_outside_bounds_not_found() {
        let bracket = bracket();
        assert!(matches!(
            bracket.dose_for_weight(4.0).unwrap_err(),
            Error::NoDoseForWeight { .. }
        ));
        assert!(matches!(
            bracket.dose_for_weight(11.0).unwrap_err(),
            Error::NoDoseForWeight { .. }
        ));
    }

    #[test]
    fn test_not_found_names_the_owning_age_range() {
        let err = bracket().dose_for_weight(4.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Dosage not found: no dosage found for weight 4 kg in age range 0 to 12 years"
        );
    }

    #[test]
    fn test_open_ended_bracket_checks_lower_bound_only() {
        let bracket = AgeBracket::new(
            AgeRange::new(17.0, None, AgeUnit::Years).unwrap(),
            vec![(
                WeightRange::new(40.0, None).unwrap(),
                Dose::new("875 mg").unwrap(),
            )],
        )
        .unwrap();
        assert!(bracket.dose_for_weight(40.0).is_ok());
        assert!(bracket.dose_for_weight(120.0).is_ok());
        assert!(bracket.dose_for_weight(39.0).is_err());
    }

    #[test]
    fn test_overlapping_brackets_first_match_wins() {
        let bracket = AgeBracket::new(
            AgeRange::new(0.0, Some(12.0), AgeUnit::Years).unwrap(),
            vec![
                (
                    WeightRange::new(5.0, Some(10.0)).unwrap(),
                    Dose::new("300 mg").unwrap(),
                ),
                (
                    WeightRange::new(8.0, Some(15.0)).unwrap(),
                    Dose::new("500 mg").unwrap(),
                ),
            ],
        )
        .unwrap();

        // 9 kg sits in both brackets; stored order decides
        assert_eq!(bracket.dose_for_weight(9.0).unwrap().value(), "300 mg");
        assert_eq!(bracket.dose_for_weight(12.0).unwrap().value(), "500 mg");
    }

    #[test]
    fn test_weight_doses_is_a_defensive_copy() {
        let bracket = bracket();
        let mut copy = bracket.weight_doses();
        copy.clear();
        // the aggregate still resolves after the copy was emptied
        assert!(bracket.dose_for_weight(7.0).is_ok());
        assert_eq!(bracket.weight_doses().len(), 1);
    }
}
