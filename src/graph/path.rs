//! Path records returned by graph queries

use serde::{Deserialize, Serialize};

/// A node as it appears inside a path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryRef {
    pub title: String,
    pub f_title: String,
}

impl CategoryRef {
    pub fn new(title: impl Into<String>, f_title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            f_title: f_title.into(),
        }
    }
}

/// One traversed edge, `start -[edge_type]-> end` in stored orientation.
///
/// Serialized as `[start_title, edge_type, end_title]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(String, String, String)", into = "(String, String, String)")]
pub struct PathEdge {
    pub start: String,
    pub edge_type: String,
    pub end: String,
}

impl PathEdge {
    pub fn new(start: impl Into<String>, edge_type: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            edge_type: edge_type.into(),
            end: end.into(),
        }
    }
}

impl From<(String, String, String)> for PathEdge {
    fn from((start, edge_type, end): (String, String, String)) -> Self {
        Self { start, edge_type, end }
    }
}

impl From<PathEdge> for (String, String, String) {
    fn from(edge: PathEdge) -> Self {
        (edge.start, edge.edge_type, edge.end)
    }
}

/// Ordered nodes plus the ordered edges between them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPath {
    pub nodes: Vec<CategoryRef>,
    pub edges: Vec<PathEdge>,
}

impl CategoryPath {
    pub fn new(nodes: Vec<CategoryRef>, edges: Vec<PathEdge>) -> Self {
        Self { nodes, edges }
    }

    /// Path length in edges
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Match keys of the nodes, in path order
    pub fn keys(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.f_title.as_str()).collect()
    }

    /// Display titles of the nodes, in path order
    pub fn titles(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.title.as_str()).collect()
    }
}
