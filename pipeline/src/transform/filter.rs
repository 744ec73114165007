//! Row filtering on required fields and numeric constraints.
//!
//! Failing rows are not errors: they are counted in [`FilterOutcome`].

use super::values::{as_f64, is_missing};
use crate::models::{Record, RecordSet};

/// Survivors plus drop counts per reason
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    pub records: RecordSet,
    /// Rows missing at least one required field
    pub dropped_missing: usize,
    /// Rows failing a strictly-positive constraint
    pub dropped_constraint: usize,
}

impl FilterOutcome {
    pub fn dropped(&self) -> usize {
        self.dropped_missing + self.dropped_constraint
    }
}

/// `true` when every field is present and non-null.
pub fn has_all(record: &Record, fields: &[&str]) -> bool {
    fields.iter().all(|f| !is_missing(record.get(*f)))
}

/// Keep records with every `required` field present and every `positive`
/// field strictly greater than zero. Survivor order is preserved.
pub fn filter_rows(records: RecordSet, required: &[&str], positive: &[&str]) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();

    for record in records {
        if !has_all(&record, required) {
            outcome.dropped_missing += 1;
            continue;
        }
        let positive_ok = positive
            .iter()
            .all(|f| as_f64(record.get(*f)).map_or(false, |v| v > 0.0));
        if !positive_ok {
            outcome.dropped_constraint += 1;
            continue;
        }
        outcome.records.push(record);
    }

    outcome
}

/// Keep records where at least one of `fields` is present.
pub fn retain_any_present(records: RecordSet, fields: &[&str]) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();
    for record in records {
        if fields.iter().any(|f| !is_missing(record.get(*f))) {
            outcome.records.push(record);
        } else {
            outcome.dropped_missing += 1;
        }
    }
    outcome
}
