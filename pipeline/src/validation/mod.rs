//! JSON Schema validation of emitted tree documents.
//!
//! The tree schema (`schemas/hierarchy-tree.json`, Draft 7) is embedded at
//! compile time. It is recursive: every node must have a non-empty `name`,
//! and may carry `children`, a non-negative integer `size`, a `tooltip`
//! object and a `countries` string list. Unknown keys are rejected.
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use surveytree::validation::{is_valid_tree, validate_tree};
//!
//! let tree = json!({
//!     "name": "All Respondents",
//!     "children": [{ "name": "Python", "size": 3 }]
//! });
//! assert!(is_valid_tree(&tree));
//!
//! let broken = json!({ "children": [] });
//! assert!(validate_tree(&broken).is_err());
//! ```

use once_cell::sync::Lazy;
use serde_json::Value;

static TREE_SCHEMA: Lazy<Result<Value, String>> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/hierarchy-tree.json"))
        .map_err(|e| format!("Invalid embedded tree schema: {}", e))
});

/// Validate a JSON value against a Draft 7 schema.
///
/// Returns every violation as a message.
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Quick check, no error details.
pub fn is_valid(schema: &Value, data: &Value) -> bool {
    jsonschema::draft7::is_valid(schema, data)
}

/// The embedded tree schema.
pub fn tree_schema() -> Result<&'static Value, String> {
    TREE_SCHEMA.as_ref().map_err(Clone::clone)
}

/// Validate a tree document against the embedded tree schema.
pub fn validate_tree(data: &Value) -> Result<(), Vec<String>> {
    let schema = tree_schema().map_err(|e| vec![e])?;
    validate(schema, data)
}

/// Quick check against the embedded tree schema.
pub fn is_valid_tree(data: &Value) -> bool {
    tree_schema().map_or(false, |schema| is_valid(schema, data))
}
