//! # Surveytree - developer survey exports to chart data
//!
//! Surveytree turns a wide developer-survey export (one row per respondent,
//! many multi-valued tool columns) into hierarchical tree documents and edge
//! lists for tree, circular-packing and chord charts.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│    Transform     │────▶│  Tree JSON  │
//! │  (ISO/UTF8) │     │  (auto-enc) │     │ (KNN, explode,   │     │  CSV / edges│
//! └─────────────┘     └─────────────┘     │  aggregate, tree)│     └─────────────┘
//!                                         └──────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use surveytree::{run_file, PipelineConfig, Variant};
//! use std::path::Path;
//!
//! let output = run_file(Path::new("survey.csv"), Variant::Tools, &PipelineConfig::default())?;
//! println!("{}", output.tree_json()?.unwrap_or_default());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Records, tree nodes and chord links
//! - [`logs`] - Stage logging to stderr
//! - [`config`] - Run configuration
//! - [`parser`] - CSV reading and writing with auto-detection
//! - [`transform`] - Pipeline stages and orchestration
//! - [`validation`] - Tree document schema validation

// Core modules
pub mod config;
pub mod error;
pub mod logs;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Validation
pub mod validation;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{CsvResult, ImputationError, PipelineError, PipelineResult, SchemaError};

// =============================================================================
// Re-exports - Models & configuration
// =============================================================================

pub use config::PipelineConfig;
pub use models::{ChordLink, HierarchyNode, Record, RecordSet};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{is_valid, is_valid_tree, validate, validate_tree};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    decode_content,
    detect_delimiter,
    detect_encoding,
    parse_bytes_auto,
    parse_csv,
    parse_csv_file_auto,
    write_records,
    write_rows,
    CsvError,
    ParseResult,
};

// =============================================================================
// Re-exports - Schema
// =============================================================================

pub use transform::schema::{FieldClass, FieldSpec, SurveySchema};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    run_bytes,
    run_file,
    run_parsed,
    run_with_schema,
    CsvInfo,
    PipelineOutput,
    StageReport,
    Variant,
};
