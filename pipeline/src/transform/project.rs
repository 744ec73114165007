//! Field projection: keep the schema's columns, renamed to the working schema.

use serde_json::Value;

use super::schema::{FieldClass, SurveySchema};
use super::values::{as_f64, is_missing, number};
use crate::error::SchemaError;
use crate::models::{Record, RecordSet};

/// Select and rename the schema's fields.
///
/// The header is checked once before any row is touched, so a missing column
/// fails the run without partial output. Numeric-metric fields are coerced to
/// numbers; text that does not parse becomes `null`.
pub fn project(
    records: &[Record],
    headers: &[String],
    schema: &SurveySchema,
) -> Result<RecordSet, SchemaError> {
    schema.validate_headers(headers)?;

    let projected = records
        .iter()
        .map(|row| {
            let mut out = Record::new();
            for spec in &schema.fields {
                let raw = row.get(&spec.source);
                let value = if is_missing(raw) {
                    Value::Null
                } else if spec.has(FieldClass::NumericMetric) {
                    as_f64(raw).map(number).unwrap_or(Value::Null)
                } else {
                    raw.cloned().unwrap_or(Value::Null)
                };
                out.insert(spec.target.clone(), value);
            }
            out
        })
        .collect();

    Ok(projected)
}
