//! Transformation module.
//!
//! One submodule per pipeline stage, plus the orchestrator:
//! - Schema: field selection and classification per variant
//! - Project / Filter / Impute / Normalize: record cleaning
//! - Explode / Aggregate / Merge / Sample: reshaping
//! - Hierarchy / Chord: chart output builders
//! - Pipeline: end-to-end runs

pub mod aggregate;
pub mod chord;
pub mod explode;
pub mod filter;
pub mod hierarchy;
pub mod impute;
pub mod merge;
pub mod normalize;
pub mod pipeline;
pub mod project;
pub mod sample;
pub mod schema;
pub mod values;

pub use aggregate::{aggregate_metrics, CoarseMetrics, MetricTables};
pub use chord::{build_chord_links, respondent_type};
pub use explode::{explode_column, explode_fields, parse_list, split_list_fields};
pub use filter::{filter_rows, FilterOutcome};
pub use hierarchy::{build_circular_pack, build_tool_hierarchy};
pub use impute::{impute_categorical, CategoryCodes, KnnImputer};
pub use merge::{merge_metrics, METRIC_COLUMNS};
pub use normalize::{normalize, NormalizeOutcome};
pub use pipeline::*;
pub use project::project;
pub use sample::sample_fraction;
pub use schema::{fields, FieldClass, FieldSpec, SurveySchema};
