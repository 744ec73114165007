//! Tree assembly from final record sets.
//!
//! Both trees share the same shape below the root:
//!
//! ```text
//! root
//! └── industry          (size, tooltip?)
//!     └── role          (size, tooltip?)
//!         └── category  (one per tool field with at least one value)
//!             └── tool  (size = occurrences, tooltip?)
//! ```
//!
//! Groups are visited in name order. Tools are ordered by descending count,
//! then name. A node left without children is not emitted, so empty
//! categories remove their role and empty roles remove their industry.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

use super::aggregate::country_of;
use super::merge::{AVERAGE_AI_SENTIMENT, AVERAGE_JOB_SATISFACTION, AVERAGE_SALARY, AVERAGE_SALARY_BY_COUNTRY, COUNT};
use super::schema::fields::{COUNTRY, INDUSTRY, JOB_ROLE};
use super::values::{as_f64, as_key, mean, optional_number, round2};
use crate::models::{HierarchyNode, Record};

/// Root label of the tool hierarchy
pub const TOOL_ROOT_LABEL: &str = "All Respondents";

/// Root label of the circular pack
pub const PACK_ROOT_LABEL: &str = "Industries";

/// Synthetic first entry of the root country list
pub const ALL_COUNTRIES: &str = "All Countries";

// Tooltip keys
const TIP_INDUSTRY: &str = "Industry";
const TIP_JOB_ROLE: &str = "Job Role";
const TIP_TOOL_NAME: &str = "Tool Name";
const TIP_COUNTRY: &str = "Country";
const TIP_SALARY_ALL: &str = "Average Salary (All Countries)";
const TIP_SALARY_BY_COUNTRY: &str = "Average Salary By Country";
const TIP_SATISFACTION: &str = "Average Job Satisfaction";
const TIP_SENTIMENT: &str = "Average AI Sentiment";

type Group<'a> = Vec<&'a Record>;

/// Group records by the text value of `field`, skipping missing values.
fn group_by<'a, I>(records: I, field: &str) -> BTreeMap<String, Group<'a>>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut groups: BTreeMap<String, Group<'a>> = BTreeMap::new();
    for record in records {
        if let Some(key) = as_key(record.get(field)) {
            groups.entry(key).or_default().push(record);
        }
    }
    groups
}

/// Occurrences of each value of `field`, most frequent first.
pub fn value_counts(records: &[&Record], field: &str) -> Vec<(String, u64)> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for record in records {
        if let Some(value) = as_key(record.get(field)) {
            *counts.entry(value).or_insert(0) += 1;
        }
    }
    let mut counts: Vec<(String, u64)> = counts.into_iter().collect();
    // stable: ties keep name order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Category nodes of one role group; categories without values are skipped.
fn category_nodes<F>(rows: &[&Record], categories: &[String], leaf: F) -> Vec<HierarchyNode>
where
    F: Fn(&str, &str, u64) -> HierarchyNode,
{
    categories
        .iter()
        .filter_map(|category| {
            let tools: Vec<HierarchyNode> = value_counts(rows, category)
                .into_iter()
                .map(|(tool, count)| leaf(category, &tool, count))
                .collect();
            (!tools.is_empty()).then(|| HierarchyNode::branch(category.as_str(), tools))
        })
        .collect()
}

fn mean_of(rows: &[&Record], field: &str) -> Value {
    optional_number(mean(rows.iter().filter_map(|r| as_f64(r.get(field)))).map(round2))
}

fn count_sum(rows: &[&Record]) -> u64 {
    rows.iter()
        .filter_map(|r| r.get(COUNT).and_then(Value::as_u64))
        .sum()
}

/// Sorted distinct countries, missing values excluded.
pub fn distinct_countries(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| as_key(r.get(COUNTRY)))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Industry → role → category → tool tree with occurrence counts.
///
/// Industry and role nodes carry the number of rows in their group.
pub fn build_tool_hierarchy(records: &[Record], categories: &[String]) -> HierarchyNode {
    let industries = group_by(records, INDUSTRY)
        .into_iter()
        .filter_map(|(industry, rows)| {
            let roles: Vec<HierarchyNode> = group_by(rows.iter().copied(), JOB_ROLE)
                .into_iter()
                .filter_map(|(role, rows)| {
                    let children = category_nodes(&rows, categories, |_, tool, count| {
                        HierarchyNode::leaf(tool, count)
                    });
                    (!children.is_empty())
                        .then(|| HierarchyNode::branch(role, children).with_size(rows.len() as u64))
                })
                .collect();
            (!roles.is_empty())
                .then(|| HierarchyNode::branch(industry, roles).with_size(rows.len() as u64))
        })
        .collect();

    HierarchyNode::branch(TOOL_ROOT_LABEL, industries)
}

/// Geography-aware tree over merged records.
///
/// Industry and role sizes are the sum of the merged `Count` column. The
/// root lists every country, prefixed by "All Countries".
pub fn build_circular_pack(records: &[Record], categories: &[String]) -> HierarchyNode {
    let industries = group_by(records, INDUSTRY)
        .into_iter()
        .filter_map(|(industry, rows)| {
            let roles: Vec<HierarchyNode> = group_by(rows.iter().copied(), JOB_ROLE)
                .into_iter()
                .filter_map(|(role, rows)| role_node(&industry, role, &rows, categories))
                .collect();
            if roles.is_empty() {
                return None;
            }

            let mut tooltip = Map::new();
            tooltip.insert(TIP_INDUSTRY.into(), Value::from(industry.as_str()));
            tooltip.insert(TIP_SATISFACTION.into(), mean_of(&rows, AVERAGE_JOB_SATISFACTION));
            tooltip.insert(TIP_SENTIMENT.into(), mean_of(&rows, AVERAGE_AI_SENTIMENT));

            Some(
                HierarchyNode::branch(industry, roles)
                    .with_size(count_sum(&rows))
                    .with_tooltip(tooltip),
            )
        })
        .collect();

    let mut countries = vec![ALL_COUNTRIES.to_string()];
    countries.extend(distinct_countries(records));

    HierarchyNode::branch(PACK_ROOT_LABEL, industries).with_countries(countries)
}

fn role_node(industry: &str, role: String, rows: &[&Record], categories: &[String]) -> Option<HierarchyNode> {
    let children = category_nodes(rows, categories, |category, tool, count| {
        let countries: BTreeSet<String> = rows
            .iter()
            .filter(|r| as_key(r.get(category)).as_deref() == Some(tool))
            .map(|r| country_of(r))
            .collect();

        let mut tooltip = Map::new();
        tooltip.insert(TIP_JOB_ROLE.into(), Value::from(role.as_str()));
        tooltip.insert(TIP_TOOL_NAME.into(), Value::from(tool));
        tooltip.insert(
            TIP_COUNTRY.into(),
            Value::Array(countries.into_iter().map(Value::String).collect()),
        );
        HierarchyNode::leaf(tool, count).with_tooltip(tooltip)
    });
    if children.is_empty() {
        return None;
    }

    let mut by_country: BTreeMap<String, Vec<&Record>> = BTreeMap::new();
    for row in rows {
        by_country.entry(country_of(row)).or_default().push(*row);
    }
    let salary_by_country: Map<String, Value> = by_country
        .into_iter()
        .map(|(country, group)| (country, mean_of(&group, AVERAGE_SALARY_BY_COUNTRY)))
        .collect();

    let mut tooltip = Map::new();
    tooltip.insert(TIP_INDUSTRY.into(), Value::from(industry));
    tooltip.insert(TIP_JOB_ROLE.into(), Value::from(role.as_str()));
    tooltip.insert(TIP_SALARY_ALL.into(), mean_of(rows, AVERAGE_SALARY));
    tooltip.insert(TIP_SALARY_BY_COUNTRY.into(), Value::Object(salary_by_country));
    tooltip.insert(TIP_SATISFACTION.into(), mean_of(rows, AVERAGE_JOB_SATISFACTION));
    tooltip.insert(TIP_SENTIMENT.into(), mean_of(rows, AVERAGE_AI_SENTIMENT));

    Some(
        HierarchyNode::branch(role, children)
            .with_size(count_sum(rows))
            .with_tooltip(tooltip),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(values: Vec<Value>) -> Vec<Record> {
        values.into_iter().map(|v| v.as_object().cloned().unwrap()).collect()
    }

    fn categories(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_tool_tree_counts_and_order() {
        let records = rows(vec![
            json!({ "Industry": "Tech", "Job Role": "Dev", "Tools": "A" }),
            json!({ "Industry": "Tech", "Job Role": "Dev", "Tools": "B" }),
            json!({ "Industry": "Tech", "Job Role": "Dev", "Tools": "A" }),
            json!({ "Industry": "Finance", "Job Role": "Analyst", "Tools": "C" }),
        ]);

        let tree = build_tool_hierarchy(&records, &categories(&["Tools"]));

        assert_eq!(tree.name, TOOL_ROOT_LABEL);
        let names: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Finance", "Tech"]);

        let tools = tree.descend(&["Tech", "Dev", "Tools"]).unwrap();
        assert_eq!(tools.children[0], HierarchyNode::leaf("A", 2));
        assert_eq!(tools.children[1], HierarchyNode::leaf("B", 1));
        assert_eq!(tree.descend(&["Tech", "Dev"]).unwrap().size, Some(3));
    }

    #[test]
    fn test_empty_groups_are_pruned() {
        let records = rows(vec![
            json!({ "Industry": "Tech", "Job Role": "Dev", "Tools": "A" }),
            json!({ "Industry": "Tech", "Job Role": "Manager", "Tools": null }),
            json!({ "Industry": "Retail", "Job Role": "Ops", "Tools": "" }),
        ]);

        let tree = build_tool_hierarchy(&records, &categories(&["Tools", "Databases"]));

        assert_eq!(tree.children.len(), 1);
        let tech = tree.child("Tech").unwrap();
        assert!(tech.child("Manager").is_none());
        let dev = tech.child("Dev").unwrap();
        assert!(dev.child("Databases").is_none());
        assert!(tree.child("Retail").is_none());
    }

    #[test]
    fn test_value_counts_ties_by_name() {
        let records = rows(vec![
            json!({ "Db": "Redis" }),
            json!({ "Db": "MySQL" }),
            json!({ "Db": "Redis" }),
            json!({ "Db": "Oracle" }),
        ]);
        let refs: Vec<&Record> = records.iter().collect();

        assert_eq!(
            value_counts(&refs, "Db"),
            vec![
                ("Redis".to_string(), 2u64),
                ("MySQL".to_string(), 1),
                ("Oracle".to_string(), 1),
            ]
        );
    }

    fn merged(country: &str, tool: &str, by_country: f64) -> Value {
        json!({
            "Industry": "Tech",
            "Job Role": "Dev",
            "Country": country,
            "Tools": tool,
            "Average_Salary_By_Country": by_country,
            "Average_Salary": 45000.0,
            "Average_Job_Satisfaction": 7.5,
            "Average_AI_Sentiment": 3.0,
            "Count": 2
        })
    }

    #[test]
    fn test_circular_pack_shape() {
        let records = rows(vec![
            merged("Peru", "A", 30000.0),
            merged("Chile", "A", 60000.0),
            merged("Chile", "B", 60000.0),
        ]);

        let tree = build_circular_pack(&records, &categories(&["Tools"]));

        assert_eq!(tree.name, PACK_ROOT_LABEL);
        assert_eq!(
            tree.countries,
            Some(vec!["All Countries".into(), "Chile".into(), "Peru".into()])
        );

        let tech = tree.child("Tech").unwrap();
        assert_eq!(tech.size, Some(6));
        let tip = tech.tooltip.as_ref().unwrap();
        assert_eq!(tip["Average Job Satisfaction"], 7.5);

        let dev = tech.child("Dev").unwrap();
        let tip = dev.tooltip.as_ref().unwrap();
        assert_eq!(tip["Job Role"], "Dev");
        assert_eq!(tip["Average Salary (All Countries)"], 45000.0);
        assert_eq!(
            tip["Average Salary By Country"],
            json!({ "Chile": 60000.0, "Peru": 30000.0 })
        );

        let a = dev.descend(&["Tools", "A"]).unwrap();
        assert_eq!(a.size, Some(2));
        let tip = a.tooltip.as_ref().unwrap();
        assert_eq!(tip["Tool Name"], "A");
        assert_eq!(tip["Country"], json!(["Chile", "Peru"]));

        let b = dev.descend(&["Tools", "B"]).unwrap();
        assert_eq!(b.tooltip.as_ref().unwrap()["Country"], json!(["Chile"]));
    }
}
