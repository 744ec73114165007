//! Group metrics computed on the pre-explosion record set.
//!
//! Two tables are built in one pass:
//!
//! ```text
//! fine   (industry, role, country) → mean salary
//! coarse (industry, role)          → mean salary, mean satisfaction,
//!                                    mean sentiment, row count
//! ```
//!
//! Means under the plausibility floor are discarded. A discarded fine mean is
//! refilled with the mean of the plausible fine means of its (industry, role)
//! group; a discarded coarse salary stays missing.

use std::collections::BTreeMap;

use super::impute::UNKNOWN;
use super::schema::fields::{AI_SENTIMENT, ANNUAL_SALARY, COUNTRY, INDUSTRY, JOB_ROLE, JOB_SATISFACTION};
use super::values::{as_f64, as_key, mean, round2};
use crate::models::Record;

/// (industry, role)
pub type RoleKey = (String, String);

/// (industry, role, country)
pub type CountryKey = (String, String, String);

/// Coarse metrics of one (industry, role) group
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoarseMetrics {
    pub average_salary: Option<f64>,
    pub average_job_satisfaction: Option<f64>,
    pub average_ai_sentiment: Option<f64>,
    /// Rows in the group
    pub count: u64,
}

/// Both aggregate tables, sorted by key
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricTables {
    pub by_country: BTreeMap<CountryKey, Option<f64>>,
    pub by_role: BTreeMap<RoleKey, CoarseMetrics>,
}

impl MetricTables {
    pub fn country_salary(&self, key: &CountryKey) -> Option<f64> {
        self.by_country.get(key).copied().flatten()
    }

    pub fn role(&self, key: &RoleKey) -> Option<&CoarseMetrics> {
        self.by_role.get(key)
    }

    /// Groups whose salary is still missing after the fallback
    pub fn unresolved(&self) -> usize {
        self.by_country.values().filter(|v| v.is_none()).count()
            + self.by_role.values().filter(|m| m.average_salary.is_none()).count()
    }
}

/// Country of a record, "Unknown" when missing.
pub fn country_of(record: &Record) -> String {
    as_key(record.get(COUNTRY)).unwrap_or_else(|| UNKNOWN.to_string())
}

/// (industry, role) of a record; `None` when either is missing.
pub fn role_key(record: &Record) -> Option<RoleKey> {
    Some((as_key(record.get(INDUSTRY))?, as_key(record.get(JOB_ROLE))?))
}

/// Accumulates one coarse group's values.
#[derive(Default)]
struct RoleAccumulator {
    salaries: Vec<f64>,
    satisfaction: Vec<f64>,
    sentiment: Vec<f64>,
    count: u64,
}

impl RoleAccumulator {
    fn add(&mut self, record: &Record) {
        self.count += 1;
        if let Some(v) = as_f64(record.get(ANNUAL_SALARY)) {
            self.salaries.push(v);
        }
        if let Some(v) = as_f64(record.get(JOB_SATISFACTION)) {
            self.satisfaction.push(v);
        }
        if let Some(v) = as_f64(record.get(AI_SENTIMENT)) {
            self.sentiment.push(v);
        }
    }

    fn build(self, floor: f64) -> CoarseMetrics {
        CoarseMetrics {
            average_salary: plausible(mean(self.salaries), floor).map(round2),
            average_job_satisfaction: mean(self.satisfaction).map(round2),
            average_ai_sentiment: mean(self.sentiment).map(round2),
            count: self.count,
        }
    }
}

fn plausible(value: Option<f64>, floor: f64) -> Option<f64> {
    value.filter(|v| *v >= floor)
}

/// Build both tables from cleaned records.
///
/// Records missing industry or role are skipped. Every group seen is kept,
/// including those whose salary stays missing.
pub fn aggregate_metrics(records: &[Record], floor: f64) -> MetricTables {
    let mut fine: BTreeMap<CountryKey, Vec<f64>> = BTreeMap::new();
    let mut coarse: BTreeMap<RoleKey, RoleAccumulator> = BTreeMap::new();

    for record in records {
        let Some((industry, role)) = role_key(record) else {
            continue;
        };
        let country = country_of(record);

        let salaries = fine
            .entry((industry.clone(), role.clone(), country))
            .or_default();
        if let Some(v) = as_f64(record.get(ANNUAL_SALARY)) {
            salaries.push(v);
        }
        coarse.entry((industry, role)).or_default().add(record);
    }

    // Fine means with implausible values removed, then refilled per group
    let raw: BTreeMap<CountryKey, Option<f64>> = fine
        .into_iter()
        .map(|(key, values)| (key, plausible(mean(values), floor)))
        .collect();

    let mut group_means: BTreeMap<RoleKey, Vec<f64>> = BTreeMap::new();
    for ((industry, role, _), value) in &raw {
        if let Some(v) = value {
            group_means
                .entry((industry.clone(), role.clone()))
                .or_default()
                .push(*v);
        }
    }
    let group_means: BTreeMap<RoleKey, f64> = group_means
        .into_iter()
        .filter_map(|(key, values)| mean(values).map(|m| (key, m)))
        .collect();

    let by_country = raw
        .into_iter()
        .map(|(key, value)| {
            let filled = value.or_else(|| {
                group_means
                    .get(&(key.0.clone(), key.1.clone()))
                    .copied()
            });
            (key, filled.map(round2))
        })
        .collect();

    let by_role = coarse
        .into_iter()
        .map(|(key, acc)| (key, acc.build(floor)))
        .collect();

    MetricTables { by_country, by_role }
}
