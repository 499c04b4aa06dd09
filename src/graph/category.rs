//! Category nodes and subcategory edges
//!
//! A category is identified by its display title and its folded match key
//! (`f_title`). Edges always point from the more general parent category
//! to the more specific child.

use super::types::{EdgeId, EdgeType, NodeId};
use serde::{Deserialize, Serialize};

/// A category node in the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier for this node
    pub id: NodeId,

    /// Human-readable title
    pub title: String,

    /// Case- and whitespace-folded title used for matching
    pub f_title: String,
}

impl Category {
    pub fn new(id: NodeId, title: impl Into<String>, f_title: impl Into<String>) -> Self {
        Category {
            id,
            title: title.into(),
            f_title: f_title.into(),
        }
    }
}

/// A directed `parent -[subcat]-> child` edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcatEdge {
    /// Unique identifier for this edge
    pub id: EdgeId,

    /// The more general category (edge goes FROM this node)
    pub parent: NodeId,

    /// The more specific category (edge goes TO this node)
    pub child: NodeId,

    /// Relationship type, `subcat`
    pub edge_type: EdgeType,
}

impl SubcatEdge {
    pub fn new(id: EdgeId, parent: NodeId, child: NodeId) -> Self {
        SubcatEdge {
            id,
            parent,
            child,
            edge_type: EdgeType::subcat(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_defaults_to_subcat() {
        let edge = SubcatEdge::new(EdgeId::new(1), NodeId::new(1), NodeId::new(2));
        assert_eq!(edge.edge_type.as_str(), "subcat");
        assert_eq!(edge.parent, NodeId::new(1));
        assert_eq!(edge.child, NodeId::new(2));
    }
}
