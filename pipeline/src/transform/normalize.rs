//! Numeric clipping, ordinal mapping and deduplication.

use serde_json::Value;
use std::collections::HashSet;

use super::schema::{ClipRange, FieldClass, OrdinalScale, SurveySchema};
use super::values::{as_f64, number};
use crate::models::RecordSet;

/// Normalized records plus what changed
#[derive(Debug, Clone, Default)]
pub struct NormalizeOutcome {
    pub records: RecordSet,
    /// Cells moved onto a clip bound
    pub clipped: usize,
    /// Duplicate records removed
    pub duplicates: usize,
}

/// Clip `field` into `range`. Values outside are set to the bound, never
/// dropped; non-numeric cells are left alone.
pub fn clip_numeric(records: &mut RecordSet, field: &str, range: ClipRange) -> usize {
    let mut clipped = 0;
    for record in records.iter_mut() {
        if let Some(v) = as_f64(record.get(field)) {
            let bounded = v.clamp(range.min, range.max);
            if bounded != v {
                clipped += 1;
            }
            record.insert(field.to_string(), number(bounded));
        }
    }
    clipped
}

/// Replace labels of `field` by their integer level.
pub fn map_ordinal(records: &mut RecordSet, field: &str, scale: &OrdinalScale) {
    for record in records.iter_mut() {
        let level = scale.level(record.get(field).and_then(Value::as_str));
        record.insert(field.to_string(), Value::from(level));
    }
}

/// Drop records identical across all fields, keeping the first occurrence.
pub fn drop_duplicates(records: RecordSet) -> (RecordSet, usize) {
    let before = records.len();
    let mut seen = HashSet::with_capacity(before);
    let kept: RecordSet = records
        .into_iter()
        .filter(|record| {
            // Map keys are ordered, so equal records serialize identically
            let key = serde_json::to_string(record).unwrap_or_default();
            seen.insert(key)
        })
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}

/// Apply the schema's clip ranges and ordinal scales, then deduplicate when
/// the schema asks for it.
pub fn normalize(mut records: RecordSet, schema: &SurveySchema) -> NormalizeOutcome {
    let mut clipped = 0;
    for spec in &schema.fields {
        if spec.has(FieldClass::NumericMetric) {
            if let Some(range) = spec.clip {
                clipped += clip_numeric(&mut records, &spec.target, range);
            }
        }
        if spec.has(FieldClass::OrdinalString) {
            let scale = spec.ordinal.clone().unwrap_or(OrdinalScale {
                levels: Default::default(),
                fallback: 0,
            });
            map_ordinal(&mut records, &spec.target, &scale);
        }
    }

    let (records, duplicates) = if schema.deduplicate {
        drop_duplicates(records)
    } else {
        (records, 0)
    };

    NormalizeOutcome {
        records,
        clipped,
        duplicates,
    }
}
