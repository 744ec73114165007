//! Multi-valued field splitting and explosion.
//!
//! List cells arrive as bracketed, quoted text (`"['Python', 'SQL']"`) or as
//! plain delimited text (`"Python, SQL"`). Each listed field is split, capped,
//! and then exploded on its own, one field after another:
//!
//! ```text
//!  {Lang: [Go, Rust], Db: [PG]}        explode Lang        explode Db
//!                                  →   {Lang: Go,   Db: [PG]}   →   {Lang: Go,   Db: PG}
//!                                      {Lang: Rust, Db: [PG]}       {Lang: Rust, Db: PG}
//! ```
//!
//! Each round acts on the output of the previous round. A record whose list is
//! empty for a field disappears at that field's round.

use serde_json::Value;

use crate::models::RecordSet;

/// Characters stripped from both ends of a list cell.
const LIST_BRACKETS: &[char] = &['[', ']'];

/// Split one cell into at most `cap` values.
///
/// Missing and non-string cells give an empty list, as do cells whose
/// values are all blank.
pub fn parse_list(value: Option<&Value>, delimiter: &str, cap: usize) -> Vec<String> {
    let Some(Value::String(text)) = value else {
        return Vec::new();
    };
    text.trim()
        .trim_matches(LIST_BRACKETS)
        .replace('\'', "")
        .split(delimiter)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .take(cap)
        .map(String::from)
        .collect()
}

/// Replace every listed field by a JSON array of its capped values.
pub fn split_list_fields(mut records: RecordSet, fields: &[&str], delimiter: &str, cap: usize) -> RecordSet {
    for record in records.iter_mut() {
        for field in fields {
            let values = parse_list(record.get(*field), delimiter, cap);
            let list = values.into_iter().map(Value::String).collect();
            record.insert(field.to_string(), Value::Array(list));
        }
    }
    records
}

/// Expand one array-valued field into one record per element.
///
/// Empty arrays drop the record; non-array cells are kept as they are.
pub fn explode_column(records: RecordSet, field: &str) -> RecordSet {
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        match record.get(field) {
            Some(Value::Array(items)) => {
                let items = items.clone();
                let Some((last, rest)) = items.split_last() else {
                    continue;
                };
                for item in rest {
                    let mut copy = record.clone();
                    copy.insert(field.to_string(), item.clone());
                    out.push(copy);
                }
                let mut record = record;
                record.insert(field.to_string(), last.clone());
                out.push(record);
            }
            _ => out.push(record),
        }
    }
    out
}

/// Row count that exploding `fields` (already split) would produce.
///
/// Saturates instead of overflowing so callers can compare it to a bound
/// before allocating anything.
pub fn exploded_len(records: &RecordSet, fields: &[&str]) -> usize {
    records
        .iter()
        .map(|record| {
            fields.iter().fold(1usize, |acc, field| match record.get(*field) {
                Some(Value::Array(items)) => acc.saturating_mul(items.len()),
                _ => acc,
            })
        })
        .fold(0usize, usize::saturating_add)
}

/// Sequential single-column explode over `fields`, in order.
pub fn explode_fields(records: RecordSet, fields: &[&str]) -> RecordSet {
    fields
        .iter()
        .fold(records, |acc, field| explode_column(acc, field))
}
