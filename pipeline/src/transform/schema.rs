//! Survey schema definitions.
//!
//! A [`SurveySchema`] declares which raw export columns a pipeline variant
//! keeps, what they are renamed to, and how each renamed field is treated by
//! the later stages ([`FieldClass`]). The built-in schemas match the Stack
//! Overflow developer survey export.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::SchemaError;

/// Working-schema field names shared by stages and hierarchy builders.
pub mod fields {
    pub const JOB_ROLE: &str = "Job Role";
    pub const PROGRAMMING_LANGUAGES: &str = "Programming Languages";
    pub const DATABASES: &str = "Databases";
    pub const PLATFORMS: &str = "Platforms";
    pub const WEB_FRAMEWORKS: &str = "Web Frameworks";
    pub const AI_TOOLS: &str = "AI Tools";
    pub const IDE_COLLABORATION_TOOLS: &str = "IDE Collaboration Tools";
    pub const OFFICE_STACK_TOOLS: &str = "Office Stack Tools";
    pub const INDUSTRY: &str = "Industry";
    pub const ANNUAL_SALARY: &str = "Annual Salary";
    pub const JOB_SATISFACTION: &str = "Job Satisfaction";
    pub const AI_SENTIMENT: &str = "AI Sentiment";
    pub const COUNTRY: &str = "Country";
    pub const MAIN_BRANCH: &str = "MainBranch";
    pub const AI_TOOLS_HAVE: &str = "AISearchDevHaveWorkedWith";
    pub const AI_TOOLS_WANT: &str = "AISearchDevWantToWorkWith";

    /// Tool categories, in the order they appear under a role.
    pub const TOOL_CATEGORIES: [&str; 7] = [
        PROGRAMMING_LANGUAGES,
        DATABASES,
        PLATFORMS,
        WEB_FRAMEWORKS,
        AI_TOOLS,
        IDE_COLLABORATION_TOOLS,
        OFFICE_STACK_TOOLS,
    ];
}

use fields::*;

/// How a field is treated by the pipeline. A field may carry several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldClass {
    /// Row dropped when missing
    Required,
    /// Missing values filled by nearest-neighbour imputation
    Imputable,
    /// Coerced to a number, optionally clipped
    NumericMetric,
    /// Mapped to an integer scale
    OrdinalString,
    /// Delimited list, exploded into one row per value
    MultiValued,
    /// Used for aggregation joins
    GroupingKey,
}

/// Inclusive clip range for a numeric field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipRange {
    pub min: f64,
    pub max: f64,
}

/// Label → integer scale for an ordinal field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdinalScale {
    pub levels: BTreeMap<String, i64>,
    /// Value for unrecognised or missing labels
    #[serde(default)]
    pub fallback: i64,
}

impl OrdinalScale {
    pub fn level(&self, label: Option<&str>) -> i64 {
        label
            .and_then(|l| self.levels.get(l))
            .copied()
            .unwrap_or(self.fallback)
    }

    /// AI sentiment answers, most favourable first.
    pub fn ai_sentiment() -> Self {
        let levels = [
            ("Very favorable", 5),
            ("Favorable", 4),
            ("Indifferent", 3),
            ("Unsure", 2),
            ("Unfavorable", 1),
            ("Very unfavorable", 0),
        ]
        .into_iter()
        .map(|(label, level)| (label.to_string(), level))
        .collect();
        Self { levels, fallback: 0 }
    }
}

/// One projected field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Column name in the raw export
    pub source: String,
    /// Name in the working schema
    pub target: String,
    #[serde(default)]
    pub classes: Vec<FieldClass>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip: Option<ClipRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<OrdinalScale>,
}

impl FieldSpec {
    pub fn new(source: &str, target: &str, classes: &[FieldClass]) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            classes: classes.to_vec(),
            clip: None,
            ordinal: None,
        }
    }

    pub fn with_clip(mut self, min: f64, max: f64) -> Self {
        self.clip = Some(ClipRange { min, max });
        self
    }

    pub fn with_ordinal(mut self, scale: OrdinalScale) -> Self {
        self.ordinal = Some(scale);
        self
    }

    pub fn has(&self, class: FieldClass) -> bool {
        self.classes.contains(&class)
    }
}

/// Fixed schema of one pipeline variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveySchema {
    /// Human-readable name
    pub name: String,

    /// Projected fields, in output column order
    pub fields: Vec<FieldSpec>,

    /// Numeric fields that must be strictly positive
    #[serde(default)]
    pub positive: Vec<String>,

    /// Multi-valued fields shown as tool categories in the tree
    #[serde(default)]
    pub tool_categories: Vec<String>,

    /// Remove duplicate records after normalization
    #[serde(default)]
    pub deduplicate: bool,

    /// Compute and merge salary / satisfaction aggregates
    #[serde(default)]
    pub aggregate: bool,

    /// Down-sample the exploded record set
    #[serde(default)]
    pub sample: bool,
}

impl SurveySchema {
    /// Parse a schema from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Raw column names this schema reads
    pub fn source_columns(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.source.as_str()).collect()
    }

    /// Working field names, in declaration order
    pub fn targets(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.target.clone()).collect()
    }

    /// Working field names carrying `class`, in declaration order
    pub fn with_class(&self, class: FieldClass) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.has(class))
            .map(|f| f.target.as_str())
            .collect()
    }

    pub fn field(&self, target: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.target == target)
    }

    /// Check that every source column exists in the input header
    pub fn validate_headers(&self, headers: &[String]) -> Result<(), SchemaError> {
        let missing: Vec<String> = self
            .source_columns()
            .into_iter()
            .filter(|col| !headers.iter().any(|h| h == col))
            .map(String::from)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::new(missing))
        }
    }

    /// Industry → role → tool tree with imputed categorical tool fields.
    pub fn tool_hierarchy() -> Self {
        use FieldClass::*;
        Self {
            name: "tool-hierarchy".to_string(),
            fields: vec![
                FieldSpec::new("DevType", JOB_ROLE, &[Required, GroupingKey]),
                FieldSpec::new("LanguageHaveWorkedWith", PROGRAMMING_LANGUAGES, &[Required, MultiValued]),
                FieldSpec::new("DatabaseHaveWorkedWith", DATABASES, &[Imputable, MultiValued]),
                FieldSpec::new("PlatformHaveWorkedWith", PLATFORMS, &[Imputable, MultiValued]),
                FieldSpec::new("WebframeHaveWorkedWith", WEB_FRAMEWORKS, &[Imputable, MultiValued]),
                FieldSpec::new("AISearchDevHaveWorkedWith", AI_TOOLS, &[Imputable, MultiValued]),
                FieldSpec::new("NEWCollabToolsHaveWorkedWith", IDE_COLLABORATION_TOOLS, &[Required, MultiValued]),
                FieldSpec::new("OfficeStackAsyncHaveWorkedWith", OFFICE_STACK_TOOLS, &[Required, MultiValued]),
                FieldSpec::new("Industry", INDUSTRY, &[Required, MultiValued, GroupingKey]),
            ],
            positive: Vec::new(),
            tool_categories: TOOL_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            deduplicate: false,
            aggregate: false,
            sample: true,
        }
    }

    /// Geography-aware tree with salary, satisfaction and sentiment tooltips.
    pub fn circular_pack() -> Self {
        use FieldClass::*;
        Self {
            name: "circular-pack".to_string(),
            fields: vec![
                FieldSpec::new("DevType", JOB_ROLE, &[Required, GroupingKey]),
                FieldSpec::new("LanguageHaveWorkedWith", PROGRAMMING_LANGUAGES, &[Required, MultiValued]),
                FieldSpec::new("DatabaseHaveWorkedWith", DATABASES, &[Required, MultiValued]),
                FieldSpec::new("PlatformHaveWorkedWith", PLATFORMS, &[Required, MultiValued]),
                FieldSpec::new("WebframeHaveWorkedWith", WEB_FRAMEWORKS, &[Required, MultiValued]),
                FieldSpec::new("AISearchDevHaveWorkedWith", AI_TOOLS, &[Required, MultiValued]),
                FieldSpec::new("NEWCollabToolsHaveWorkedWith", IDE_COLLABORATION_TOOLS, &[Required, MultiValued]),
                FieldSpec::new("OfficeStackAsyncHaveWorkedWith", OFFICE_STACK_TOOLS, &[Required, MultiValued]),
                FieldSpec::new("ConvertedCompYearly", ANNUAL_SALARY, &[Required, NumericMetric])
                    .with_clip(10_000.0, 150_000.0),
                FieldSpec::new("JobSat", JOB_SATISFACTION, &[Required, NumericMetric]),
                FieldSpec::new("AISent", AI_SENTIMENT, &[Required, OrdinalString])
                    .with_ordinal(OrdinalScale::ai_sentiment()),
                FieldSpec::new("Country", COUNTRY, &[Required, GroupingKey]),
                FieldSpec::new("Industry", INDUSTRY, &[Required, MultiValued, GroupingKey]),
            ],
            positive: vec![ANNUAL_SALARY.to_string()],
            tool_categories: TOOL_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            deduplicate: true,
            aggregate: true,
            sample: false,
        }
    }

    /// Have-worked-with → want-to-work-with AI tool pairs.
    pub fn chord() -> Self {
        use FieldClass::*;
        Self {
            name: "chord".to_string(),
            fields: vec![
                FieldSpec::new(MAIN_BRANCH, MAIN_BRANCH, &[GroupingKey]),
                FieldSpec::new(AI_TOOLS_HAVE, AI_TOOLS_HAVE, &[MultiValued]),
                FieldSpec::new(AI_TOOLS_WANT, AI_TOOLS_WANT, &[MultiValued]),
            ],
            positive: Vec::new(),
            tool_categories: Vec::new(),
            deduplicate: false,
            aggregate: false,
            sample: false,
        }
    }
}
