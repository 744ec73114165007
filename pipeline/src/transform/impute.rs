//! Categorical imputation with k-nearest neighbours.
//!
//! Each imputable field is factorized into integer codes (first-appearance
//! order, "Unknown" counted as missing). The codes form a feature matrix with
//! one column per field; missing cells are estimated by averaging the same
//! column over the k nearest rows under the NaN-aware Euclidean distance, then
//! rounded and mapped back to a category label.
//!
//! ```text
//!  Databases   Platforms        codes            imputed        labels
//!  "MySQL"     "AWS"            [0,    0]        [0, 0]         MySQL  AWS
//!  "Unknown"   "AWS"      →     [None, 0]   →    [0, 0]    →    MySQL  AWS
//!  "Redis"     "GCP"            [1,    1]        [1, 1]         Redis  GCP
//! ```
//!
//! Only missing cells are written back.

use serde_json::Value;
use std::collections::HashMap;

use super::values::{as_key, round_half_even};
use crate::error::ImputationError;
use crate::models::RecordSet;

/// Missing-value sentinel label, also used for out-of-range codes.
pub const UNKNOWN: &str = "Unknown";

/// Ordered code → label table for one field, built once per run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryCodes {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl CategoryCodes {
    /// Assign codes in first-appearance order, skipping missing values.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let mut codes = Self::default();
        for value in values.into_iter().flatten() {
            let label = value.as_ref();
            if !codes.index.contains_key(label) {
                codes.index.insert(label.to_string(), codes.labels.len());
                codes.labels.push(label.to_string());
            }
        }
        codes
    }

    pub fn code(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Label for a (possibly fractional or out-of-range) estimate.
    ///
    /// The estimate is rounded half-to-even; anything outside the table
    /// yields [`UNKNOWN`].
    pub fn label_for(&self, estimate: f64) -> &str {
        if !estimate.is_finite() {
            return UNKNOWN;
        }
        let code = round_half_even(estimate);
        if code < 0.0 || code >= self.labels.len() as f64 {
            return UNKNOWN;
        }
        &self.labels[code as usize]
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Category of a cell, `None` when missing or "Unknown".
fn category(value: Option<&Value>) -> Option<String> {
    as_key(value).filter(|s| s != UNKNOWN)
}

/// Euclidean distance over the coordinates present in both rows, scaled up
/// by `total / present`. `None` when the rows share no coordinate.
pub fn nan_euclidean(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let mut sum = 0.0;
    let mut present = 0usize;
    for (x, y) in a.iter().zip(b) {
        if let (Some(x), Some(y)) = (x, y) {
            sum += (x - y) * (x - y);
            present += 1;
        }
    }
    if present == 0 {
        return None;
    }
    let weight = a.len() as f64 / present as f64;
    Some((weight * sum).sqrt())
}

/// k-nearest-neighbour imputer with uniform weights.
#[derive(Debug, Clone, Copy)]
pub struct KnnImputer {
    n_neighbors: usize,
}

impl KnnImputer {
    pub fn new(n_neighbors: usize) -> Result<Self, ImputationError> {
        if n_neighbors == 0 {
            return Err(ImputationError::InvalidNeighbours(n_neighbors));
        }
        Ok(Self { n_neighbors })
    }

    pub fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }

    /// Fill every `None` cell; present cells are copied unchanged.
    ///
    /// Donors for a cell are the rows where that column is present and whose
    /// distance to the receiver is defined. Ties in distance go to the earlier
    /// row. With no usable donor the column mean is used; a column with no
    /// observed value at all yields NaN.
    pub fn fit_transform(&self, matrix: &[Vec<Option<f64>>]) -> Vec<Vec<f64>> {
        let n_cols = matrix.first().map_or(0, Vec::len);
        let column_means: Vec<f64> = (0..n_cols)
            .map(|c| {
                let observed: Vec<f64> = matrix.iter().filter_map(|row| row[c]).collect();
                if observed.is_empty() {
                    f64::NAN
                } else {
                    observed.iter().sum::<f64>() / observed.len() as f64
                }
            })
            .collect();

        let mut output: Vec<Vec<f64>> = matrix
            .iter()
            .map(|row| row.iter().map(|cell| cell.unwrap_or(f64::NAN)).collect())
            .collect();

        for (r, row) in matrix.iter().enumerate() {
            if row.iter().all(Option::is_some) {
                continue;
            }

            // One distance row per receiver, shared by all its missing columns
            let distances: Vec<Option<f64>> = matrix
                .iter()
                .enumerate()
                .map(|(j, other)| if j == r { None } else { nan_euclidean(row, other) })
                .collect();

            for c in (0..n_cols).filter(|&c| row[c].is_none()) {
                let mut donors: Vec<(f64, usize)> = distances
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| matrix[*j][c].is_some())
                    .filter_map(|(j, d)| d.map(|d| (d, j)))
                    .collect();

                output[r][c] = if donors.is_empty() {
                    column_means[c]
                } else {
                    let by_distance =
                        |a: &(f64, usize), b: &(f64, usize)| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1));
                    if donors.len() > self.n_neighbors {
                        donors.select_nth_unstable_by(self.n_neighbors - 1, by_distance);
                        donors.truncate(self.n_neighbors);
                    }
                    let total: f64 = donors.iter().filter_map(|(_, j)| matrix[*j][c]).sum();
                    total / donors.len() as f64
                };
            }
        }

        output
    }
}

/// Imputed records plus the number of cells filled per field
#[derive(Debug, Clone, Default)]
pub struct ImputeOutcome {
    pub records: RecordSet,
    pub filled: Vec<(String, usize)>,
}

/// Fill missing and "Unknown" cells of `fields` without discarding records.
///
/// # Errors
/// [`ImputationError::MissingField`] when a field is absent from every
/// record, [`ImputationError::NoObservedValues`] when a field has nothing to
/// factorize.
pub fn impute_categorical(
    mut records: RecordSet,
    fields: &[&str],
    n_neighbors: usize,
) -> Result<ImputeOutcome, ImputationError> {
    let imputer = KnnImputer::new(n_neighbors)?;
    if fields.is_empty() || records.is_empty() {
        return Ok(ImputeOutcome {
            records,
            filled: fields.iter().map(|f| (f.to_string(), 0)).collect(),
        });
    }

    let mut tables = Vec::with_capacity(fields.len());
    for field in fields {
        if records.iter().all(|r| !r.contains_key(*field)) {
            return Err(ImputationError::MissingField { field: field.to_string() });
        }
        let codes = CategoryCodes::from_values(records.iter().map(|r| category(r.get(*field))));
        if codes.is_empty() {
            return Err(ImputationError::NoObservedValues { field: field.to_string() });
        }
        tables.push(codes);
    }

    let matrix: Vec<Vec<Option<f64>>> = records
        .iter()
        .map(|record| {
            fields
                .iter()
                .zip(&tables)
                .map(|(field, codes)| {
                    category(record.get(*field))
                        .and_then(|label| codes.code(&label))
                        .map(|code| code as f64)
                })
                .collect()
        })
        .collect();

    let mut filled = vec![0usize; fields.len()];
    if matrix.iter().any(|row| row.iter().any(Option::is_none)) {
        let estimates = imputer.fit_transform(&matrix);
        for (r, record) in records.iter_mut().enumerate() {
            for (c, field) in fields.iter().enumerate() {
                if matrix[r][c].is_none() {
                    let label = tables[c].label_for(estimates[r][c]);
                    record.insert(field.to_string(), Value::String(label.to_string()));
                    filled[c] += 1;
                }
            }
        }
    }

    Ok(ImputeOutcome {
        records,
        filled: fields.iter().map(|f| f.to_string()).zip(filled).collect(),
    })
}
