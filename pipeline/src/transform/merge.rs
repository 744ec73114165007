//! Left join of the aggregate tables onto exploded records.

use serde_json::Value;

use super::aggregate::{country_of, role_key, MetricTables};
use super::filter::{filter_rows, FilterOutcome};
use super::values::optional_number;
use crate::models::RecordSet;

pub const AVERAGE_SALARY_BY_COUNTRY: &str = "Average_Salary_By_Country";
pub const AVERAGE_SALARY: &str = "Average_Salary";
pub const AVERAGE_JOB_SATISFACTION: &str = "Average_Job_Satisfaction";
pub const AVERAGE_AI_SENTIMENT: &str = "Average_AI_Sentiment";
pub const COUNT: &str = "Count";

/// Merged metric columns, in output order
pub const METRIC_COLUMNS: [&str; 5] = [
    AVERAGE_SALARY_BY_COUNTRY,
    AVERAGE_SALARY,
    AVERAGE_JOB_SATISFACTION,
    AVERAGE_AI_SENTIMENT,
    COUNT,
];

/// Attach fine and coarse metrics to every record, then drop records with any
/// metric missing.
///
/// Unmatched keys produce `null` metrics, so they always end up in
/// `dropped_missing` of the returned outcome.
pub fn merge_metrics(mut records: RecordSet, tables: &MetricTables) -> FilterOutcome {
    for record in records.iter_mut() {
        let key = role_key(record);

        let by_country = key.as_ref().and_then(|(industry, role)| {
            tables.country_salary(&(industry.clone(), role.clone(), country_of(record)))
        });
        let coarse = key.as_ref().and_then(|k| tables.role(k));

        record.insert(AVERAGE_SALARY_BY_COUNTRY.to_string(), optional_number(by_country));
        record.insert(
            AVERAGE_SALARY.to_string(),
            optional_number(coarse.and_then(|m| m.average_salary)),
        );
        record.insert(
            AVERAGE_JOB_SATISFACTION.to_string(),
            optional_number(coarse.and_then(|m| m.average_job_satisfaction)),
        );
        record.insert(
            AVERAGE_AI_SENTIMENT.to_string(),
            optional_number(coarse.and_then(|m| m.average_ai_sentiment)),
        );
        record.insert(
            COUNT.to_string(),
            coarse.map_or(Value::Null, |m| Value::from(m.count)),
        );
    }

    filter_rows(records, &METRIC_COLUMNS, &[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::aggregate::aggregate_metrics;
    use serde_json::json;

    fn rows(values: Vec<Value>) -> RecordSet {
        values.into_iter().map(|v| v.as_object().cloned().unwrap()).collect()
    }

    #[test]
    fn test_merge_attaches_both_tables() {
        let cleaned = rows(vec![
            json!({ "Industry": "Tech", "Job Role": "Dev", "Country": "Chile", "Annual Salary": 50000.0, "Job Satisfaction": 8.0, "AI Sentiment": 4 }),
            json!({ "Industry": "Tech", "Job Role": "Dev", "Country": "Peru", "Annual Salary": 30000.0, "Job Satisfaction": 6.0, "AI Sentiment": 2 }),
        ]);
        let tables = aggregate_metrics(&cleaned, 10_000.0);

        let exploded = rows(vec![
            json!({ "Industry": "Tech", "Job Role": "Dev", "Country": "Chile", "Databases": "Redis" }),
            json!({ "Industry": "Tech", "Job Role": "Dev", "Country": "Chile", "Databases": "SQLite" }),
            json!({ "Industry": "Tech", "Job Role": "Dev", "Country": "Peru", "Databases": "Redis" }),
        ]);

        let outcome = merge_metrics(exploded, &tables);

        assert_eq!(outcome.records.len(), 3);
        let first = &outcome.records[0];
        assert_eq!(first[AVERAGE_SALARY_BY_COUNTRY], 50000.0);
        assert_eq!(first[AVERAGE_SALARY], 40000.0);
        assert_eq!(first[AVERAGE_JOB_SATISFACTION], 7.0);
        assert_eq!(first[AVERAGE_AI_SENTIMENT], 3.0);
        assert_eq!(first[COUNT], 2);
        assert_eq!(outcome.records[2][AVERAGE_SALARY_BY_COUNTRY], 30000.0);
    }

    #[test]
    fn test_unmatched_and_missing_metrics_are_dropped() {
        let cleaned = rows(vec![
            json!({ "Industry": "Tech", "Job Role": "Dev", "Country": "Chile", "Annual Salary": 50000.0, "Job Satisfaction": 8.0, "AI Sentiment": 4 }),
            json!({ "Industry": "Retail", "Job Role": "Intern", "Country": "Chile", "Annual Salary": 2000.0, "Job Satisfaction": 5.0, "AI Sentiment": 1 }),
        ]);
        let tables = aggregate_metrics(&cleaned, 10_000.0);

        let exploded = rows(vec![
            json!({ "Industry": "Tech", "Job Role": "Dev", "Country": "Chile" }),
            json!({ "Industry": "Tech", "Job Role": "Ops", "Country": "Chile" }),
            json!({ "Industry": "Retail", "Job Role": "Intern", "Country": "Chile" }),
        ]);

        let outcome = merge_metrics(exploded, &tables);

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.dropped_missing, 2);
        for record in &outcome.records {
            assert!(METRIC_COLUMNS.iter().all(|c| !record[*c].is_null()));
        }
    }
}
