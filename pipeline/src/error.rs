//! Error types for the surveytree transformation pipeline.
//!
//! - [`CsvError`] - CSV reading and decoding errors (defined in [`crate::parser`])
//! - [`SchemaError`] - Declared source columns absent from the input
//! - [`ImputationError`] - Degenerate categorical feature matrix
//! - [`PipelineError`] - Top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across stage boundaries.
//!
//! Rows failing a filter are never errors: they are counted in the
//! stage report and logged.

use thiserror::Error;

pub use crate::parser::CsvError;

// =============================================================================
// Schema Errors
// =============================================================================

/// One or more declared source columns are absent from the input header.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Missing source column(s): {}", .missing.join(", "))]
pub struct SchemaError {
    /// Every declared source column that was not found.
    pub missing: Vec<String>,
}

impl SchemaError {
    pub fn new(missing: Vec<String>) -> Self {
        Self { missing }
    }
}

// =============================================================================
// Imputation Errors
// =============================================================================

/// The categorical feature matrix cannot be built.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImputationError {
    /// The field has no observed (non-missing) value in the working set.
    #[error("Field '{field}' has no observed values to factorize")]
    NoObservedValues { field: String },

    /// The field is not present on the working records.
    #[error("Imputable field '{field}' is not part of the working set")]
    MissingField { field: String },

    /// Neighbour count must be at least one.
    #[error("Invalid neighbour count: {0}")]
    InvalidNeighbours(usize),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the error type returned by [`crate::transform::pipeline::run_file`]
/// and friends. Schema and imputation errors abort the run before any
/// output is written.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV reading error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// CSV writing error.
    #[error("CSV write error: {0}")]
    CsvWrite(#[from] csv::Error),

    /// Schema error.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Imputation error.
    #[error("Imputation error: {0}")]
    Imputation(#[from] ImputationError),

    /// A filtering or join stage removed every row.
    #[error("Stage '{stage}' produced no rows")]
    EmptyResult { stage: String },

    /// The exploded record set would exceed the configured row bound.
    #[error("Stage '{stage}' would produce {rows} rows (limit {limit})")]
    TooManyRows {
        stage: String,
        rows: usize,
        limit: usize,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The emitted tree document failed schema validation.
    #[error("Tree validation failed: {}", .errors.join("; "))]
    Validation { errors: Vec<String> },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn empty(stage: impl Into<String>) -> Self {
        Self::EmptyResult {
            stage: stage.into(),
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
