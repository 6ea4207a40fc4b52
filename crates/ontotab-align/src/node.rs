//! Graph nodes and edges.
//!
//! Columns carry all the interesting state; class and property nodes are
//! materialized lazily when a semantic type is confirmed, and a
//! [`SemanticEdge`] ties the three together.

use serde::{Deserialize, Serialize};

use crate::semantic_type::SemanticType;

/// A node of the alignment graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Node {
    Column(ColumnNode),
    Class(ClassNode),
    Property(PropertyNode),
}

impl Node {
    pub fn id(&self) -> &str {
        match self {
            Node::Column(n) => &n.id,
            Node::Class(n) => &n.id,
            Node::Property(n) => &n.id,
        }
    }

    pub fn as_column(&self) -> Option<&ColumnNode> {
        match self {
            Node::Column(n) => Some(n),
            _ => None,
        }
    }
}

/// One worksheet column inside the graph. The id is the source header id, so
/// a column is never represented twice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnNode {
    pub id: String,
    pub name: String,
    /// Candidate semantic types, ranked by descending confidence. Empty until
    /// a prediction run lands or a user assigns one.
    pub suggestions: Vec<SemanticType>,
    /// The confirmed semantic type, once a suggestion is accepted.
    pub confirmed: Option<SemanticType>,
}

impl ColumnNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            suggestions: Vec::new(),
            confirmed: None,
        }
    }

    pub fn has_suggestions(&self) -> bool {
        !self.suggestions.is_empty()
    }
}

/// An ontology class referenced by a confirmed semantic type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassNode {
    /// The class URI.
    pub id: String,
    pub label: String,
}

/// An ontology property referenced by a confirmed semantic type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyNode {
    /// The property URI.
    pub id: String,
    pub label: String,
}

/// A confirmed column-to-ontology assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticEdge {
    pub column_id: String,
    pub class_id: String,
    pub property_uri: String,
}

/// The tail of a URI after the last `#` or `/`, used as a display label for
/// class and property nodes.
pub(crate) fn local_name(uri: &str) -> String {
    uri.rsplit(['#', '/']).next().unwrap_or(uri).to_string()
}
