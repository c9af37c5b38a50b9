//! Age-group selection over bracketed dosing rules.
//!
//! This is the resolution core: given a patient's age, age unit, and weight,
//! pick the single applicable age bracket and defer weight resolution to it.
//! Boundary semantics here are deliberately asymmetric with the weight
//! tables: age containment is upper-bound-exclusive (with one equality
//! fallback for the final bracket), while weight containment is inclusive
//! on both ends.

use crate::{AgeBracket, AgeUnit, Error, Result};
use serde::Serialize;

/// An ordered, non-empty collection of age brackets
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AgeGroups {
    brackets: Vec<AgeBracket>,
}

impl AgeGroups {
    /// Construct from a bracket list in source order
    ///
    /// Fails when the list is empty. Brackets may overlap and may mix age
    /// units; resolution order is defined by `bracket_for`, not storage
    /// order.
    pub fn new(brackets: Vec<AgeBracket>) -> Result<Self> {
        if brackets.is_empty() {
            return Err(Error::EmptyAgeBrackets);
        }
        Ok(Self { brackets })
    }

    /// Select the age bracket applying to `(age, unit)`
    ///
    /// The working order is: bounded brackets ascending by minimum age,
    /// then open-ended brackets. Open-ended brackets therefore only match
    /// after every bounded bracket has been tried, regardless of their
    /// minimum age.
    ///
    /// A bracket matches when its unit equals `unit`, `age >= min`, and
    /// either the bracket is open-ended or `age < max` (upper bound
    /// exclusive). When the scan finds nothing, the last bracket of the
    /// working order matches on exact upper-bound equality, so the final
    /// bounded bracket is closed at the top only when no open-ended
    /// bracket follows it and nothing earlier applied.
    ///
    /// When two bounded brackets both contain `age`, the one with the
    /// lower minimum age wins; ties keep source order.
    ///
    /// `weight` is not consulted here; it only labels the not-found error.
    pub fn bracket_for(&self, age: f64, unit: AgeUnit, weight: f64) -> Result<&AgeBracket> {
        let ordered = self.working_order();

        for &bracket in &ordered {
            let range = bracket.age_range();
            if range.unit() != unit || age < range.min_age() {
                continue;
            }
            match range.max_age() {
                None => {
                    tracing::debug!("age {} {} matched open-ended bracket {}", age, unit, range);
                    return Ok(bracket);
                }
                Some(max) if age < max => {
                    tracing::debug!("age {} {} matched bracket {}", age, unit, range);
                    return Ok(bracket);
                }
                Some(_) => {}
            }
        }

        // Exact upper-bound equality closes the last bracket of the order.
        if let Some(&last) = ordered.last() {
            let range = last.age_range();
            if range.unit() == unit {
                if let Some(max) = range.max_age() {
                    if age == max {
                        tracing::debug!(
                            "age {} {} matched final bracket {} at its upper bound",
                            age,
                            unit,
                            range
                        );
                        return Ok(last);
                    }
                }
            }
        }

        Err(Error::NoDoseForPatient { age, unit, weight })
    }

    /// Bounded brackets ascending by minimum age, open-ended brackets last
    fn working_order(&self) -> Vec<&AgeBracket> {
        let mut ordered: Vec<&AgeBracket> = self.brackets.iter().collect();
        ordered.sort_by(|a, b| {
            let (a, b) = (a.age_range(), b.age_range());
            a.is_open_ended()
                .cmp(&b.is_open_ended())
                .then(a.min_age().total_cmp(&b.min_age()))
        });
        ordered
    }

    /// Defensive copy of the bracket list in storage order
    pub fn brackets(&self) -> Vec<AgeBracket> {
        self.brackets.clone()
    }
}
