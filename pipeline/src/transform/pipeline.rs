//! High-level pipeline API: survey export in, chart data out.
//!
//! Each variant runs a fixed sequence of stages. Every stage fully
//! materializes its output before the next one starts.
//!
//! ```text
//! tools          project → filter → impute → normalize → explode → sample → tree
//! circular-pack  project → filter → impute → normalize → aggregate ┐
//!                                                      → explode → merge → tree
//! chord          project → filter(any list present) → edges
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use surveytree::{run_file, PipelineConfig, Variant};
//! use std::path::Path;
//!
//! let output = run_file(
//!     Path::new("survey_results_public.csv"),
//!     Variant::CircularPack,
//!     &PipelineConfig::default(),
//! )?;
//! output.write_outputs(Some(Path::new("circular_pack_dataset.csv")), Some(Path::new("circular_packing_chart.json")))?;
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use super::aggregate::{aggregate_metrics, MetricTables};
use super::chord::build_chord_links;
use super::explode::{explode_fields, exploded_len, split_list_fields};
use super::filter::{filter_rows, retain_any_present, FilterOutcome};
use super::hierarchy::{build_circular_pack, build_tool_hierarchy};
use super::impute::impute_categorical;
use super::merge::{merge_metrics, METRIC_COLUMNS};
use super::normalize::normalize;
use super::project::project;
use super::sample::sample_fraction;
use super::schema::{FieldClass, SurveySchema};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::models::{ChordLink, HierarchyNode, RecordSet};
use crate::parser::{parse_bytes_auto, parse_csv_file_auto, write_records, write_rows, ParseResult};
use crate::validation::validate_tree;

/// Pipeline variant, one per chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Industry → role → category → tool counts
    Tools,
    /// Tool tree annotated with salary, satisfaction and sentiment
    CircularPack,
    /// AI tool have/want edge list
    Chord,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Tools, Variant::CircularPack, Variant::Chord];

    pub fn name(&self) -> &'static str {
        match self {
            Variant::Tools => "tools",
            Variant::CircularPack => "circular-pack",
            Variant::Chord => "chord",
        }
    }

    /// Built-in schema of this variant
    pub fn schema(&self) -> SurveySchema {
        match self {
            Variant::Tools => SurveySchema::tool_hierarchy(),
            Variant::CircularPack => SurveySchema::circular_pack(),
            Variant::Chord => SurveySchema::chord(),
        }
    }

    pub fn emits_tree(&self) -> bool {
        !matches!(self, Variant::Chord)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::ALL
            .into_iter()
            .find(|v| v.name() == s)
            .ok_or_else(|| PipelineError::Config(format!("Unknown variant '{}'", s)))
    }
}

/// Rows entering and leaving one stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: String,
    pub rows_in: usize,
    pub rows_out: usize,
}

impl StageReport {
    pub fn dropped(&self) -> usize {
        self.rows_in.saturating_sub(self.rows_out)
    }
}

/// CSV file information
#[derive(Debug, Clone, Serialize)]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// Result of a complete pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub variant: Variant,

    /// Output CSV columns (tree variants)
    pub columns: Vec<String>,

    /// Final record set (tree variants) or the kept respondents (chord)
    pub records: RecordSet,

    /// Tree document (tree variants)
    pub tree: Option<HierarchyNode>,

    /// Edge list (chord)
    pub links: Vec<ChordLink>,

    /// Per-stage row counts, in run order
    pub stages: Vec<StageReport>,

    /// CSV parsing metadata
    pub csv_info: CsvInfo,
}

impl PipelineOutput {
    /// Write the tabular output: records for tree variants, edges for chord.
    pub fn write_csv<W: Write>(&self, writer: W) -> PipelineResult<()> {
        match self.variant {
            Variant::Chord => write_rows(writer, &self.links)?,
            Variant::Tools | Variant::CircularPack => write_records(writer, &self.columns, &self.records)?,
        }
        Ok(())
    }

    /// Pretty-printed tree document, if this variant has one.
    pub fn tree_json(&self) -> PipelineResult<Option<String>> {
        let json = self.tree.as_ref().map(serde_json::to_string_pretty).transpose()?;
        Ok(json)
    }

    /// Write whichever outputs have a destination.
    pub fn write_outputs(&self, csv_path: Option<&Path>, tree_path: Option<&Path>) -> PipelineResult<()> {
        if let Some(path) = csv_path {
            self.write_csv(BufWriter::new(File::create(path)?))?;
            log_success(format!("Saved CSV to {}", path.display()));
        }
        if let (Some(path), Some(json)) = (tree_path, self.tree_json()?) {
            std::fs::write(path, json)?;
            log_success(format!("Saved tree to {}", path.display()));
        }
        Ok(())
    }
}

/// Run a variant on a CSV file.
pub fn run_file(path: &Path, variant: Variant, config: &PipelineConfig) -> PipelineResult<PipelineOutput> {
    let parsed = parse_csv_file_auto(path)?;
    run_parsed(parsed, variant, config)
}

/// Run a variant on raw CSV bytes.
pub fn run_bytes(bytes: &[u8], variant: Variant, config: &PipelineConfig) -> PipelineResult<PipelineOutput> {
    let parsed = parse_bytes_auto(bytes)?;
    run_parsed(parsed, variant, config)
}

/// Run a variant with its built-in schema on already-parsed CSV data.
pub fn run_parsed(parsed: ParseResult, variant: Variant, config: &PipelineConfig) -> PipelineResult<PipelineOutput> {
    run_with_schema(parsed, variant, &variant.schema(), config)
}

/// Run a variant with a caller-provided schema.
///
/// # Errors
/// Schema and imputation errors abort before any output exists.
/// [`PipelineError::EmptyResult`] when a filtering or join stage removes
/// every row, [`PipelineError::TooManyRows`] when explosion would exceed
/// `config.max_rows`.
pub fn run_with_schema(
    parsed: ParseResult,
    variant: Variant,
    schema: &SurveySchema,
    config: &PipelineConfig,
) -> PipelineResult<PipelineOutput> {
    config.validate()?;

    log_info("📖 Reading CSV file...");
    log_success(format!("Detected encoding: {}", parsed.encoding));
    log_success(format!("Detected separator: '{}'", format_delimiter(parsed.delimiter)));
    log_success(format!("Read {} rows", parsed.records.len()));

    let csv_info = CsvInfo {
        encoding: parsed.encoding.clone(),
        delimiter: parsed.delimiter,
        headers: parsed.headers.clone(),
        row_count: parsed.records.len(),
    };
    let mut stages = Vec::new();

    log_info(format!("🗂️  Projecting {} fields ({})...", schema.fields.len(), schema.name));
    let projected = project(&parsed.records, &parsed.headers, schema)?;
    push_stage(&mut stages, "project", parsed.records.len(), projected.len());

    match variant {
        Variant::Chord => run_chord(projected, schema, stages, csv_info),
        Variant::Tools | Variant::CircularPack => run_tree(projected, variant, schema, config, stages, csv_info),
    }
}

fn run_tree(
    projected: RecordSet,
    variant: Variant,
    schema: &SurveySchema,
    config: &PipelineConfig,
    mut stages: Vec<StageReport>,
    csv_info: CsvInfo,
) -> PipelineResult<PipelineOutput> {
    // Filter
    log_info("🧹 Filtering incomplete rows...");
    let required = schema.with_class(FieldClass::Required);
    let positive: Vec<&str> = schema.positive.iter().map(String::as_str).collect();
    let rows_in = projected.len();
    let filtered = filter_rows(projected, &required, &positive);
    log_filter(&filtered);
    push_stage(&mut stages, "filter", rows_in, filtered.records.len());
    ensure_rows(&filtered.records, "filter")?;

    // Impute
    let imputable = schema.with_class(FieldClass::Imputable);
    let records = if imputable.is_empty() {
        filtered.records
    } else {
        log_info(format!(
            "🧩 Imputing {} categorical field(s) (k = {})...",
            imputable.len(),
            config.knn_neighbors
        ));
        let outcome = impute_categorical(filtered.records, &imputable, config.knn_neighbors)?;
        for (field, filled) in &outcome.filled {
            log_info_indent(format!("{}: {} cell(s) filled", field, filled), 1);
        }
        outcome.records
    };

    // Normalize
    let rows_in = records.len();
    let normalized = normalize(records, schema);
    if normalized.clipped > 0 {
        log_info(format!("✂️  Clipped {} numeric value(s)", normalized.clipped));
    }
    if normalized.duplicates > 0 {
        log_info(format!("Removed {} duplicate row(s)", normalized.duplicates));
    }
    push_stage(&mut stages, "normalize", rows_in, normalized.records.len());

    // Aggregate, on the pre-explosion set
    let tables = if schema.aggregate {
        Some(aggregate(&normalized.records, schema, config))
    } else {
        None
    };

    // Explode
    let lists = schema.with_class(FieldClass::MultiValued);
    log_info(format!("💥 Exploding {} multi-valued field(s)...", lists.len()));
    let rows_in = normalized.records.len();
    let split = split_list_fields(normalized.records, &lists, &config.list_delimiter, config.explode_cap);
    let expected = exploded_len(&split, &lists);
    if expected > config.max_rows {
        return Err(PipelineError::TooManyRows {
            stage: "explode".to_string(),
            rows: expected,
            limit: config.max_rows,
        });
    }
    let mut records = explode_fields(split, &lists);
    log_success(format!("{} rows after explosion", records.len()));
    push_stage(&mut stages, "explode", rows_in, records.len());
    ensure_rows(&records, "explode")?;

    // Merge
    let mut columns = schema.targets();
    if let Some(tables) = &tables {
        log_info("🔗 Merging aggregate metrics...");
        let rows_in = records.len();
        let merged = merge_metrics(records, tables);
        log_filter(&merged);
        push_stage(&mut stages, "merge", rows_in, merged.records.len());
        ensure_rows(&merged.records, "merge")?;
        records = merged.records;
        columns.extend(METRIC_COLUMNS.iter().map(|c| c.to_string()));
    }

    // Sample
    if schema.sample {
        log_info(format!(
            "🎲 Sampling {:.0}% of rows (seed {})...",
            config.sample_fraction * 100.0,
            config.sample_seed
        ));
        let rows_in = records.len();
        records = sample_fraction(records, config.sample_fraction, config.sample_seed);
        push_stage(&mut stages, "sample", rows_in, records.len());
        ensure_rows(&records, "sample")?;
    }

    // Tree
    log_info("🌳 Building hierarchy...");
    let tree = match variant {
        Variant::CircularPack => build_circular_pack(&records, &schema.tool_categories),
        _ => build_tool_hierarchy(&records, &schema.tool_categories),
    };
    if tree.children.is_empty() {
        return Err(PipelineError::empty("hierarchy"));
    }
    log_success(format!(
        "{} industries, {} leaves",
        tree.children.len(),
        tree.leaf_count()
    ));

    if config.validate_tree {
        log_info("✔️  Validating tree document...");
        let value = serde_json::to_value(&tree)?;
        validate_tree(&value).map_err(|errors| PipelineError::Validation { errors })?;
        log_success("Tree document valid");
    }

    Ok(PipelineOutput {
        variant,
        columns,
        records,
        tree: Some(tree),
        links: Vec::new(),
        stages,
        csv_info,
    })
}

fn aggregate(records: &RecordSet, schema: &SurveySchema, config: &PipelineConfig) -> MetricTables {
    log_info("📊 Aggregating metrics...");

    // Split list-valued grouping keys so the tables join the exploded rows
    let keys: Vec<&str> = schema
        .fields
        .iter()
        .filter(|f| f.has(FieldClass::GroupingKey) && f.has(FieldClass::MultiValued))
        .map(|f| f.target.as_str())
        .collect();
    let basis = split_list_fields(records.clone(), &keys, &config.list_delimiter, config.explode_cap);
    let basis = explode_fields(basis, &keys);

    let tables = aggregate_metrics(&basis, config.plausibility_floor);
    log_success(format!(
        "{} (industry, role) groups, {} (industry, role, country) groups",
        tables.by_role.len(),
        tables.by_country.len()
    ));
    let unresolved = tables.unresolved();
    if unresolved > 0 {
        log_warning(format!("{} group(s) without a plausible salary", unresolved));
    }
    tables
}

fn run_chord(
    projected: RecordSet,
    schema: &SurveySchema,
    mut stages: Vec<StageReport>,
    csv_info: CsvInfo,
) -> PipelineResult<PipelineOutput> {
    let lists = schema.with_class(FieldClass::MultiValued);
    let [have, want] = lists.as_slice() else {
        return Err(PipelineError::Config(format!(
            "Chord schema needs exactly two multi-valued fields, got {}",
            lists.len()
        )));
    };
    let branch = schema
        .with_class(FieldClass::GroupingKey)
        .first()
        .copied()
        .ok_or_else(|| PipelineError::Config("Chord schema needs a grouping key".to_string()))?;

    log_info("🧹 Dropping rows without any tool list...");
    let rows_in = projected.len();
    let kept = retain_any_present(projected, &[*have, *want]);
    log_filter(&kept);
    push_stage(&mut stages, "filter", rows_in, kept.records.len());
    ensure_rows(&kept.records, "filter")?;

    log_info("🔗 Counting tool connections...");
    let links = build_chord_links(&kept.records, have, want, branch);
    if links.is_empty() {
        return Err(PipelineError::empty("chord"));
    }
    log_success(format!("{} connection rows", links.len()));

    Ok(PipelineOutput {
        variant: Variant::Chord,
        columns: schema.targets(),
        records: kept.records,
        tree: None,
        links,
        stages,
        csv_info,
    })
}

fn push_stage(stages: &mut Vec<StageReport>, stage: &str, rows_in: usize, rows_out: usize) {
    stages.push(StageReport {
        stage: stage.to_string(),
        rows_in,
        rows_out,
    });
}

fn ensure_rows(records: &RecordSet, stage: &str) -> PipelineResult<()> {
    if records.is_empty() {
        Err(PipelineError::empty(stage))
    } else {
        Ok(())
    }
}

fn log_filter(outcome: &FilterOutcome) {
    if outcome.dropped() == 0 {
        log_success(format!("Kept all {} rows", outcome.records.len()));
        return;
    }
    log_warning(format!(
        "Kept {} rows, dropped {}",
        outcome.records.len(),
        outcome.dropped()
    ));
    if outcome.dropped_missing > 0 {
        log_info_indent(format!("• {} missing a required value", outcome.dropped_missing), 1);
    }
    if outcome.dropped_constraint > 0 {
        log_info_indent(format!("• {} failing a positive constraint", outcome.dropped_constraint), 1);
    }
}

/// Format delimiter for display
fn format_delimiter(d: char) -> &'static str {
    match d {
        ';' => ";",
        ',' => ",",
        '\t' => "TAB",
        '|' => "|",
        _ => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::schema::FieldSpec;

    fn quiet() {
        crate::logs::LOGGER.set_format(crate::logs::LogFormat::Quiet);
    }

    fn small_schema() -> SurveySchema {
        use FieldClass::*;
        SurveySchema {
            name: "small".into(),
            fields: vec![
                FieldSpec::new("Industry", "Industry", &[Required, GroupingKey]),
                FieldSpec::new("Role", "Job Role", &[Required, GroupingKey]),
                FieldSpec::new("Tools", "Tools", &[Required, MultiValued]),
            ],
            positive: vec![],
            tool_categories: vec!["Tools".into()],
            deduplicate: false,
            aggregate: false,
            sample: false,
        }
    }

    const SMALL_CSV: &str = "Industry,Role,Tools\nTech,Dev,\"[A, B]\"\nTech,Dev,[A]\nFinance,Analyst,[C]\n";

    #[test]
    fn test_three_record_tree() {
        quiet();
        let parsed = parse_bytes_auto(SMALL_CSV.as_bytes()).unwrap();
        let output = run_with_schema(parsed, Variant::Tools, &small_schema(), &PipelineConfig::default()).unwrap();

        let tree = output.tree.unwrap();
        assert_eq!(tree.children.len(), 2);
        let tools = tree.descend(&["Tech", "Dev", "Tools"]).unwrap();
        assert_eq!(tools.child("A").unwrap().size, Some(2));
        assert_eq!(tools.child("B").unwrap().size, Some(1));
        assert_eq!(
            tree.descend(&["Finance", "Analyst", "Tools", "C"]).unwrap().size,
            Some(1)
        );
        assert_eq!(output.records.len(), 4);
    }

    #[test]
    fn test_stage_report() {
        quiet();
        let csv = "Industry,Role,Tools\nTech,Dev,[A]\nTech,,[B]\nRetail,Ops,[]\n";
        let parsed = parse_bytes_auto(csv.as_bytes()).unwrap();
        let output = run_with_schema(parsed, Variant::Tools, &small_schema(), &PipelineConfig::default()).unwrap();

        let names: Vec<&str> = output.stages.iter().map(|s| s.stage.as_str()).collect();
        assert_eq!(names, vec!["project", "filter", "normalize", "explode"]);
        assert_eq!(output.stages[1].dropped(), 1);
        assert_eq!(output.stages[3].dropped(), 1);
    }

    #[test]
    fn test_missing_column_aborts() {
        quiet();
        let parsed = parse_bytes_auto(b"Industry,Tools\nTech,[A]\n").unwrap();
        let err = run_with_schema(parsed, Variant::Tools, &small_schema(), &PipelineConfig::default()).unwrap_err();

        match err {
            PipelineError::Schema(e) => assert_eq!(e.missing, vec!["Role"]),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_filter_removing_everything_is_empty_result() {
        quiet();
        let parsed = parse_bytes_auto(b"Industry,Role,Tools\nTech,NA,[A]\n").unwrap();
        let err = run_with_schema(parsed, Variant::Tools, &small_schema(), &PipelineConfig::default()).unwrap_err();

        assert!(matches!(err, PipelineError::EmptyResult { ref stage } if stage == "filter"));
    }

    #[test]
    fn test_row_bound() {
        quiet();
        let parsed = parse_bytes_auto(SMALL_CSV.as_bytes()).unwrap();
        let config = PipelineConfig {
            max_rows: 3,
            ..PipelineConfig::default()
        };
        let err = run_with_schema(parsed, Variant::Tools, &small_schema(), &config).unwrap_err();

        assert!(matches!(err, PipelineError::TooManyRows { rows: 4, limit: 3, .. }));
    }

    const TOOLS_HEADER: &str = "DevType,LanguageHaveWorkedWith,DatabaseHaveWorkedWith,PlatformHaveWorkedWith,WebframeHaveWorkedWith,AISearchDevHaveWorkedWith,NEWCollabToolsHaveWorkedWith,OfficeStackAsyncHaveWorkedWith,Industry";

    fn tools_csv() -> String {
        let rows = [
            "Developer back-end,\"[Rust, Go]\",[PostgreSQL],[AWS],[Axum],[ChatGPT],[VS Code],[Slack],Fintech",
            "Developer back-end,[Rust],NA,[AWS],[Axum],Unknown,[Vim],[Slack],Fintech",
            "Developer front-end,[TypeScript],[PostgreSQL],NA,[React],[ChatGPT],[VS Code],[Teams],Retail",
            "Developer front-end,[JavaScript],[MongoDB],[Vercel],NA,[Copilot],[WebStorm],[Teams],Retail",
            "Data scientist,[Python],[PostgreSQL],[GCP],[Flask],[ChatGPT],[Jupyter],[Slack],Healthcare",
            "Data scientist,[Python],NA,[GCP],[Flask],[Copilot],[Jupyter],NA,Healthcare",
        ];
        format!("{}\n{}\n", TOOLS_HEADER, rows.join("\n"))
    }

    fn render(output: &PipelineOutput) -> (String, String) {
        let mut csv = Vec::new();
        output.write_csv(&mut csv).unwrap();
        (String::from_utf8(csv).unwrap(), output.tree_json().unwrap().unwrap())
    }

    #[test]
    fn test_tools_variant_is_idempotent() {
        quiet();
        let config = PipelineConfig {
            sample_fraction: 0.5,
            ..PipelineConfig::default()
        };
        let csv = tools_csv();

        let first = run_bytes(csv.as_bytes(), Variant::Tools, &config).unwrap();
        let second = run_bytes(csv.as_bytes(), Variant::Tools, &config).unwrap();

        assert_eq!(render(&first), render(&second));
        assert_eq!(first.stages.last().unwrap().stage, "sample");
        // one row lacks office tools, the rest explode to six rows
        assert_eq!(first.stages[1].rows_out, 5);
        assert_eq!(first.records.len(), 3);
        for record in &first.records {
            assert!(record["Databases"].is_string());
            assert_ne!(record["AI Tools"], "Unknown");
        }
    }

    const PACK_HEADER: &str = "DevType,LanguageHaveWorkedWith,DatabaseHaveWorkedWith,PlatformHaveWorkedWith,WebframeHaveWorkedWith,AISearchDevHaveWorkedWith,NEWCollabToolsHaveWorkedWith,OfficeStackAsyncHaveWorkedWith,ConvertedCompYearly,JobSat,AISent,Country,Industry";

    fn pack_csv() -> String {
        let rows = [
            "Developer back-end,\"[Rust, Go]\",[PostgreSQL],[AWS],[Axum],[ChatGPT],[VS Code],[Slack],90000,8,Favorable,Chile,Fintech",
            "Developer back-end,[Rust],[Redis],[AWS],[Axum],[ChatGPT],[Vim],[Slack],500000,6,Very favorable,Peru,Fintech",
            "Data scientist,[Python],[MySQL],[GCP],[Flask],[Copilot],[Jupyter],[Teams],0,7,Unsure,Chile,Retail",
            "Developer back-end,\"[Rust, Go]\",[PostgreSQL],[AWS],[Axum],[ChatGPT],[VS Code],[Slack],90000,8,Favorable,Chile,Fintech",
        ];
        format!("{}\n{}\n", PACK_HEADER, rows.join("\n"))
    }

    #[test]
    fn test_circular_pack_end_to_end() {
        quiet();
        let output = run_bytes(pack_csv().as_bytes(), Variant::CircularPack, &PipelineConfig::default()).unwrap();

        let tree = output.tree.as_ref().unwrap();
        assert_eq!(tree.name, "Industries");
        assert_eq!(
            tree.countries,
            Some(vec!["All Countries".to_string(), "Chile".into(), "Peru".into()])
        );
        assert_eq!(tree.children.len(), 1);

        let role = tree.descend(&["Fintech", "Developer back-end"]).unwrap();
        assert_eq!(role.size, Some(6));
        let tip = role.tooltip.as_ref().unwrap();
        assert_eq!(tip["Average Salary (All Countries)"], 120000.0);
        assert_eq!(tip["Average Salary By Country"]["Peru"], 150000.0);
        assert_eq!(tip["Average AI Sentiment"], 4.5);

        let rust = role.descend(&["Programming Languages", "Rust"]).unwrap();
        assert_eq!(rust.size, Some(2));
        assert_eq!(
            rust.tooltip.as_ref().unwrap()["Country"],
            serde_json::json!(["Chile", "Peru"])
        );

        assert!(output.columns.ends_with(&[
            "Average_Salary_By_Country".to_string(),
            "Average_Salary".into(),
            "Average_Job_Satisfaction".into(),
            "Average_AI_Sentiment".into(),
            "Count".into(),
        ]));
        let names: Vec<&str> = output.stages.iter().map(|s| s.stage.as_str()).collect();
        assert_eq!(names, vec!["project", "filter", "normalize", "explode", "merge"]);
        assert_eq!(output.stages[2].dropped(), 1);
    }

    #[test]
    fn test_chord_end_to_end() {
        quiet();
        let csv = "MainBranch,AISearchDevHaveWorkedWith,AISearchDevWantToWorkWith\n\
                   I am a developer by profession,ChatGPT;Copilot,Claude\n\
                   I am learning to code,ChatGPT,Claude\n\
                   I code primarily as a hobby,NA,NA\n";

        let output = run_bytes(csv.as_bytes(), Variant::Chord, &PipelineConfig::default()).unwrap();

        assert!(output.tree.is_none());
        assert_eq!(output.records.len(), 2);
        let mut buf = Vec::new();
        output.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "Source,Target,RespondentType,ConnectionCount\n\
             ChatGPT,Claude,Learning to Code,1\n\
             ChatGPT,Claude,Professional Developers,1\n\
             Copilot,Claude,Professional Developers,1\n\
             ChatGPT,Claude,All Respondents,2\n\
             Copilot,Claude,All Respondents,1\n"
        );
    }

    #[test]
    fn test_variant_names() {
        for variant in Variant::ALL {
            assert_eq!(variant.name().parse::<Variant>().unwrap(), variant);
        }
        assert!("pie".parse::<Variant>().is_err());
        assert!(!Variant::Chord.emits_tree());
    }
}
