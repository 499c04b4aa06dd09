//! Core type definitions for the category graph

use super::store::{GraphError, GraphResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a category node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn new(id: u64) -> Self {
        NodeId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        NodeId(id)
    }
}

/// Unique identifier for a subcategory edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct EdgeId(pub u64);

impl EdgeId {
    pub fn new(id: u64) -> Self {
        EdgeId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

/// Edge type (relationship type). Category graphs only carry `subcat`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct EdgeType(String);

impl EdgeType {
    pub const SUBCAT: &'static str = "subcat";

    pub fn new(edge_type: impl Into<String>) -> Self {
        EdgeType(edge_type.into())
    }

    pub fn subcat() -> Self {
        EdgeType::new(Self::SUBCAT)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EdgeType {
    fn default() -> Self {
        Self::subcat()
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EdgeType {
    fn from(s: &str) -> Self {
        EdgeType(s.to_string())
    }
}

/// Language partition of the category graph (`en`, `zh`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(lang: impl Into<String>) -> Self {
        Namespace(lang.into())
    }

    /// Accept `lang` only when it is one of `supported`.
    pub fn parse(lang: &str, supported: &[String]) -> GraphResult<Self> {
        if supported.iter().any(|s| s == lang) {
            Ok(Namespace(lang.to_string()))
        } else {
            Err(GraphError::UnsupportedNamespace(lang.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Match key of a category, in the same folded form the graph is keyed by.
///
/// The key is taken as given; only empty and whitespace-only keys are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryKey(String);

impl CategoryKey {
    pub fn new(key: impl Into<String>) -> GraphResult<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(GraphError::EmptyKey);
        }
        Ok(CategoryKey(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CategoryKey {
    type Error = GraphError;

    fn try_from(value: String) -> GraphResult<Self> {
        CategoryKey::new(value)
    }
}

impl From<CategoryKey> for String {
    fn from(key: CategoryKey) -> Self {
        key.0
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fold a display title into a match key.
///
/// Whitespace and underscore runs collapse to a single `_`, the ends are
/// trimmed and the result is lowercased: `" Extinct  animals"` becomes
/// `"extinct_animals"`.
pub fn fold_title(title: &str) -> String {
    title
        .split(|c: char| c.is_whitespace() || c == '_')
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id = NodeId::new(42);
        assert_eq!(id.as_u64(), 42);
        assert_eq!(format!("{}", id), "NodeId(42)");

        let id2: NodeId = 100.into();
        assert_eq!(id2.as_u64(), 100);
    }

    #[test]
    fn test_edge_type() {
        let edge_type = EdgeType::subcat();
        assert_eq!(edge_type.as_str(), "subcat");
        assert_eq!(EdgeType::default(), edge_type);
    }

    #[test]
    fn test_namespace_parse() {
        let supported = vec!["en".to_string(), "zh".to_string()];
        assert_eq!(Namespace::parse("zh", &supported).unwrap().as_str(), "zh");
        assert_eq!(
            Namespace::parse("fr", &supported),
            Err(GraphError::UnsupportedNamespace("fr".to_string()))
        );
    }

    #[test]
    fn test_category_key_rejects_blank() {
        assert_eq!(CategoryKey::new(""), Err(GraphError::EmptyKey));
        assert_eq!(CategoryKey::new("  \t"), Err(GraphError::EmptyKey));
        // no normalization is applied to accepted keys
        assert_eq!(CategoryKey::new(" Animals ").unwrap().as_str(), " Animals ");
    }

    #[test]
    fn test_category_key_deserialize() {
        let key: CategoryKey = serde_json::from_str("\"animals\"").unwrap();
        assert_eq!(key.as_str(), "animals");
        assert!(serde_json::from_str::<CategoryKey>("\"\"").is_err());
    }

    #[test]
    fn test_fold_title() {
        assert_eq!(fold_title(" Extinct  animals"), "extinct_animals");
        assert_eq!(fold_title("Films_about__Hominids"), "films_about_hominids");
        assert_eq!(fold_title("已灭绝动物"), "已灭绝动物");
    }
}
