//! Have-worked-with → want-to-work-with edge list for the chord diagram.

use std::collections::BTreeMap;

use super::explode::parse_list;
use super::values::as_key;
use crate::models::{ChordLink, Record};

/// Respondent type of the roll-up rows
pub const ALL_RESPONDENTS: &str = "All Respondents";

/// Separator of the raw survey tool lists
pub const TOOL_DELIMITER: &str = ";";

/// Map the survey's main-branch answer to a respondent type.
pub fn respondent_type(main_branch: Option<&str>) -> &'static str {
    match main_branch {
        Some("I am a developer by profession") => "Professional Developers",
        Some("I am learning to code") => "Learning to Code",
        _ => "Other Coders",
    }
}

/// Count every (have, want) tool pair per respondent type.
///
/// Typed rows come first, sorted by (source, target, type), followed by one
/// "All Respondents" row per (source, target) summing every type. Records
/// missing either list contribute nothing.
pub fn build_chord_links(records: &[Record], have: &str, want: &str, branch: &str) -> Vec<ChordLink> {
    let mut typed: BTreeMap<(String, String, &'static str), u64> = BTreeMap::new();

    for record in records {
        let sources = parse_list(record.get(have), TOOL_DELIMITER, usize::MAX);
        let targets = parse_list(record.get(want), TOOL_DELIMITER, usize::MAX);
        let kind = respondent_type(as_key(record.get(branch)).as_deref());

        for source in &sources {
            for target in &targets {
                *typed
                    .entry((source.clone(), target.clone(), kind))
                    .or_insert(0) += 1;
            }
        }
    }

    let mut totals: BTreeMap<(String, String), u64> = BTreeMap::new();
    for ((source, target, _), count) in &typed {
        *totals.entry((source.clone(), target.clone())).or_insert(0) += count;
    }

    let mut links: Vec<ChordLink> = typed
        .into_iter()
        .map(|((source, target, kind), connection_count)| ChordLink {
            source,
            target,
            respondent_type: kind.to_string(),
            connection_count,
        })
        .collect();

    links.extend(totals.into_iter().map(|((source, target), connection_count)| ChordLink {
        source,
        target,
        respondent_type: ALL_RESPONDENTS.to_string(),
        connection_count,
    }));

    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    const BRANCH: &str = "MainBranch";
    const HAVE: &str = "Have";
    const WANT: &str = "Want";

    fn rows(values: Vec<Value>) -> Vec<Record> {
        values.into_iter().map(|v| v.as_object().cloned().unwrap()).collect()
    }

    fn link(source: &str, target: &str, kind: &str, count: u64) -> ChordLink {
        ChordLink {
            source: source.into(),
            target: target.into(),
            respondent_type: kind.into(),
            connection_count: count,
        }
    }

    #[test]
    fn test_respondent_type_mapping() {
        assert_eq!(respondent_type(Some("I am a developer by profession")), "Professional Developers");
        assert_eq!(respondent_type(Some("I am learning to code")), "Learning to Code");
        assert_eq!(respondent_type(Some("I code primarily as a hobby")), "Other Coders");
        assert_eq!(respondent_type(None), "Other Coders");
    }

    #[test]
    fn test_pairs_and_rollup() {
        let records = rows(vec![
            json!({ "MainBranch": "I am a developer by profession", "Have": "A;B", "Want": "C" }),
            json!({ "MainBranch": "I am learning to code", "Have": "A", "Want": " C " }),
        ]);

        let links = build_chord_links(&records, HAVE, WANT, BRANCH);

        assert_eq!(
            links,
            vec![
                link("A", "C", "Learning to Code", 1),
                link("A", "C", "Professional Developers", 1),
                link("B", "C", "Professional Developers", 1),
                link("A", "C", ALL_RESPONDENTS, 2),
                link("B", "C", ALL_RESPONDENTS, 1),
            ]
        );
    }

    #[test]
    fn test_missing_list_contributes_nothing() {
        let records = rows(vec![
            json!({ "MainBranch": null, "Have": "A", "Want": null }),
            json!({ "MainBranch": null, "Have": null, "Want": "B" }),
        ]);

        assert!(build_chord_links(&records, HAVE, WANT, BRANCH).is_empty());
    }

    #[test]
    fn test_csv_column_names() {
        let mut out = Vec::new();
        crate::parser::write_rows(&mut out, &[link("A", "B", "Other Coders", 3)]).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "Source,Target,RespondentType,ConnectionCount\nA,B,Other Coders,3\n"
        );
    }
}
