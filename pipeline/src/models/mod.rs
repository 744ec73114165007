//! Domain models for the surveytree pipeline.
//!
//! - [`Record`] - One respondent (or, after explosion, one respondent × value)
//! - [`HierarchyNode`] - Tree element consumed by the chart front-ends
//! - [`ChordLink`] - Source → target edge for the chord diagram

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Records
// =============================================================================

/// A working row: field name → JSON scalar (`null`, string or number).
///
/// Between the list split and the explosion of a field, that field
/// temporarily holds a JSON array.
pub type Record = Map<String, Value>;

/// A complete, materialized stage input or output.
pub type RecordSet = Vec<Record>;

// =============================================================================
// Hierarchy
// =============================================================================

/// A labeled tree element with optional size/tooltip and ordered children.
///
/// Serializes to `{name, children?, size?, tooltip?, countries?}`; leaves
/// omit `children`, and only the root of geography-aware trees carries
/// `countries`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchyNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub countries: Option<Vec<String>>,
}

impl HierarchyNode {
    /// Create an interior node.
    pub fn branch(name: impl Into<String>, children: Vec<HierarchyNode>) -> Self {
        Self {
            name: name.into(),
            children,
            size: None,
            tooltip: None,
            countries: None,
        }
    }

    /// Create a leaf carrying an occurrence count.
    pub fn leaf(name: impl Into<String>, size: u64) -> Self {
        Self::branch(name, Vec::new()).with_size(size)
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_tooltip(mut self, tooltip: Map<String, Value>) -> Self {
        self.tooltip = Some(tooltip);
        self
    }

    pub fn with_countries(mut self, countries: Vec<String>) -> Self {
        self.countries = Some(countries);
        self
    }

    /// Direct child by name.
    pub fn child(&self, name: &str) -> Option<&HierarchyNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Follow a path of child names from this node.
    pub fn descend(&self, path: &[&str]) -> Option<&HierarchyNode> {
        path.iter().try_fold(self, |node, name| node.child(name))
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of leaves below (or at) this node.
    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(HierarchyNode::leaf_count).sum()
        }
    }
}

// =============================================================================
// Chord edges
// =============================================================================

/// Aggregated connection between a tool respondents use and one they want.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordLink {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Target")]
    pub target: String,
    #[serde(rename = "RespondentType")]
    pub respondent_type: String,
    #[serde(rename = "ConnectionCount")]
    pub connection_count: u64,
}
