//! Resolution result bundle

use crate::graph::{CategoryPath, CategoryRef, PathEdge};
use serde::{Deserialize, Serialize};

/// Undirected shortest path with nodes reduced to their titles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitlePath {
    pub nodes: Vec<String>,
    pub edges: Vec<PathEdge>,
}

impl From<CategoryPath> for TitlePath {
    fn from(path: CategoryPath) -> Self {
        Self {
            nodes: path.nodes.into_iter().map(|n| n.title).collect(),
            edges: path.edges,
        }
    }
}

/// A path from source to target joined at a common ancestor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StitchedPath {
    pub ancestor: CategoryRef,
    #[serde(flatten)]
    pub path: CategoryPath,
}

impl StitchedPath {
    /// Join `ancestor -> source` and `ancestor -> target` line paths.
    ///
    /// The result walks source .. ancestor .. target, with the ancestor
    /// appearing once. Edge triples keep their parent -> child orientation.
    /// Returns `None` if either half is missing its ancestor node.
    pub fn stitch(to_source: CategoryPath, to_target: CategoryPath) -> Option<Self> {
        let ancestor = to_target.nodes.first()?.clone();
        if to_source.nodes.first() != Some(&ancestor) {
            return None;
        }

        let mut nodes: Vec<CategoryRef> = to_source.nodes.into_iter().rev().collect();
        nodes.extend(to_target.nodes.into_iter().skip(1));

        let mut edges: Vec<PathEdge> = to_source.edges.into_iter().rev().collect();
        edges.extend(to_target.edges);

        Some(Self {
            ancestor,
            path: CategoryPath::new(nodes, edges),
        })
    }
}

/// Every path attempt for one `(source, target, namespace)` query.
///
/// `d1`..`d3` are `None` when the query ran and found nothing. `d4s` is
/// `None` when the common-ancestor fallback was not run because a directed
/// path exists, and `Some(vec![])` when it ran and found no ancestor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// Undirected shortest path
    pub d1: Option<TitlePath>,
    /// Directed line path source -> target
    pub d2: Option<CategoryPath>,
    /// Directed line path target -> source
    pub d3: Option<CategoryPath>,
    /// Stitched common-ancestor paths
    pub d4s: Option<Vec<StitchedPath>>,
}

impl ResolutionResult {
    /// Whether the fallback ran
    pub fn fallback_ran(&self) -> bool {
        self.d4s.is_some()
    }

    /// No relation was found by any attempt
    pub fn is_empty(&self) -> bool {
        self.d1.is_none()
            && self.d2.is_none()
            && self.d3.is_none()
            && self.d4s.as_ref().map_or(true, Vec::is_empty)
    }
}
