//! In-memory category graph storage
//!
//! Arena-style storage: node and edge ids index into vectors, adjacency is
//! kept per node, and the folded title index resolves match keys.

use super::category::{Category, SubcatEdge};
use super::path::{CategoryPath, CategoryRef, PathEdge};
use super::types::{EdgeId, EdgeType, NodeId};
use indexmap::IndexSet;
use metapedia_graph_algorithms::{bounded_bfs, bounded_reach, Direction, GraphView, PathResult};
use rustc_hash::FxHashMap;
use std::sync::{Arc, OnceLock};
use thiserror::Error;

/// Errors that can occur during graph operations
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Category '{0}' not found")]
    CategoryNotFound(String),

    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("Category key must not be empty")]
    EmptyKey,

    #[error("Unsupported namespace '{0}'")]
    UnsupportedNamespace(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Category graph of one namespace
///
/// - categories: NodeId -> Category (arena, ids start at 1)
/// - edges: EdgeId -> SubcatEdge (arena, ids start at 1)
/// - outgoing / incoming: adjacency lists per node, insertion ordered
/// - key_index: f_title -> NodeId
#[derive(Debug, Default)]
pub struct CategoryGraph {
    categories: Vec<Category>,
    edges: Vec<SubcatEdge>,
    outgoing: Vec<Vec<EdgeId>>,
    incoming: Vec<Vec<EdgeId>>,
    key_index: FxHashMap<String, NodeId>,
    edge_index: FxHashMap<(NodeId, NodeId), EdgeId>,
    /// Topology snapshot for the algorithms crate, dropped on every mutation
    view: OnceLock<Arc<GraphView>>,
}

fn slot(id: u64) -> Option<usize> {
    (id as usize).checked_sub(1)
}

impl CategoryGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category, or return the id of the one already keyed by `f_title`
    pub fn add_category(&mut self, title: impl Into<String>, f_title: impl Into<String>) -> NodeId {
        let f_title = f_title.into();
        if let Some(&id) = self.key_index.get(&f_title) {
            return id;
        }

        let id = NodeId::new(self.categories.len() as u64 + 1);
        self.key_index.insert(f_title.clone(), id);
        self.categories.push(Category::new(id, title, f_title));
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        self.view.take();
        id
    }

    /// Add a `parent -[subcat]-> child` edge between two existing categories.
    ///
    /// Adding the same edge twice returns the first edge's id.
    pub fn add_subcat(&mut self, parent_key: &str, child_key: &str) -> GraphResult<EdgeId> {
        let parent = self.require(parent_key)?;
        let child = self.require(child_key)?;

        if let Some(&existing) = self.edge_index.get(&(parent, child)) {
            return Ok(existing);
        }

        let id = EdgeId::new(self.edges.len() as u64 + 1);
        self.edges.push(SubcatEdge::new(id, parent, child));
        self.edge_index.insert((parent, child), id);
        if let Some(list) = slot(parent.as_u64()).and_then(|i| self.outgoing.get_mut(i)) {
            list.push(id);
        }
        if let Some(list) = slot(child.as_u64()).and_then(|i| self.incoming.get_mut(i)) {
            list.push(id);
        }
        self.view.take();
        Ok(id)
    }

    fn require(&self, key: &str) -> GraphResult<NodeId> {
        self.key_index
            .get(key)
            .copied()
            .ok_or_else(|| GraphError::CategoryNotFound(key.to_string()))
    }

    /// Look up a category by its match key
    pub fn get_by_key(&self, key: &str) -> Option<&Category> {
        self.key_index.get(key).and_then(|&id| self.get_category(id))
    }

    /// Get a category by id
    pub fn get_category(&self, id: NodeId) -> Option<&Category> {
        slot(id.as_u64()).and_then(|i| self.categories.get(i))
    }

    /// Get an edge by id
    pub fn get_edge(&self, id: EdgeId) -> Option<&SubcatEdge> {
        slot(id.as_u64()).and_then(|i| self.edges.get(i))
    }

    /// Edges to the direct subcategories of a node
    pub fn outgoing(&self, id: NodeId) -> GraphResult<Vec<&SubcatEdge>> {
        let list = slot(id.as_u64())
            .and_then(|i| self.outgoing.get(i))
            .ok_or(GraphError::NodeNotFound(id))?;
        Ok(list.iter().filter_map(|&e| self.get_edge(e)).collect())
    }

    /// Edges from the direct parent categories of a node
    pub fn incoming(&self, id: NodeId) -> GraphResult<Vec<&SubcatEdge>> {
        let list = slot(id.as_u64())
            .and_then(|i| self.incoming.get(i))
            .ok_or(GraphError::NodeNotFound(id))?;
        Ok(list.iter().filter_map(|&e| self.get_edge(e)).collect())
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// CSR view of the `subcat` topology, built on first use after a mutation
    pub fn view(&self) -> Arc<GraphView> {
        Arc::clone(self.view.get_or_init(|| Arc::new(self.build_view())))
    }

    fn build_view(&self) -> GraphView {
        let nodes: Vec<u64> = self.categories.iter().map(|c| c.id.as_u64()).collect();
        let pairs: Vec<(u64, u64)> = self
            .edges
            .iter()
            .map(|e| (e.parent.as_u64(), e.child.as_u64()))
            .collect();
        GraphView::from_edges(&nodes, &pairs)
    }

    /// Shortest path between two keys within `max_hops` edges.
    ///
    /// `None` when either key is unknown or nothing fits the bound.
    pub fn shortest_path(
        &self,
        source_key: &str,
        target_key: &str,
        direction: Direction,
        max_hops: usize,
    ) -> Option<CategoryPath> {
        let source = self.key_index.get(source_key)?;
        let target = self.key_index.get(target_key)?;
        let view = self.view();
        let result = bounded_bfs(&view, source.as_u64(), target.as_u64(), direction, max_hops)?;
        Some(self.to_category_path(&result))
    }

    /// Keys of every category reachable from `start_key` within `max_level`
    /// hops, `start_key` first, in discovery order.
    pub fn reach(&self, start_key: &str, direction: Direction, max_level: usize) -> IndexSet<String> {
        let Some(start) = self.key_index.get(start_key) else {
            return IndexSet::new();
        };
        let view = self.view();
        bounded_reach(&view, start.as_u64(), direction, max_level)
            .into_iter()
            .filter_map(|id| self.get_category(NodeId::new(id)))
            .map(|c| c.f_title.clone())
            .collect()
    }

    fn to_category_path(&self, result: &PathResult) -> CategoryPath {
        let title = |id: u64| -> String {
            self.get_category(NodeId::new(id))
                .map(|c| c.title.clone())
                .unwrap_or_default()
        };
        let nodes = result
            .path
            .iter()
            .filter_map(|&id| self.get_category(NodeId::new(id)))
            .map(|c| CategoryRef::new(c.title.clone(), c.f_title.clone()))
            .collect();
        let edges = result
            .edges
            .iter()
            .map(|&(start, end)| PathEdge::new(title(start), EdgeType::SUBCAT, title(end)))
            .collect();
        CategoryPath::new(nodes, edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CategoryGraph {
        // animals -> mammals -> primates, animals -> extinct_animals
        let mut graph = CategoryGraph::new();
        graph.add_category("Animals", "animals");
        graph.add_category("Mammals", "mammals");
        graph.add_category("Primates", "primates");
        graph.add_category("Extinct animals", "extinct_animals");
        graph.add_subcat("animals", "mammals").unwrap();
        graph.add_subcat("mammals", "primates").unwrap();
        graph.add_subcat("animals", "extinct_animals").unwrap();
        graph
    }

    #[test]
    fn test_add_category_is_idempotent() {
        let mut graph = CategoryGraph::new();
        let a = graph.add_category("Animals", "animals");
        let b = graph.add_category("Animals (dup)", "animals");
        assert_eq!(a, b);
        assert_eq!(graph.category_count(), 1);
        assert_eq!(graph.get_by_key("animals").unwrap().title, "Animals");
    }

    #[test]
    fn test_add_subcat() {
        let mut graph = sample();
        assert_eq!(graph.edge_count(), 3);

        let again = graph.add_subcat("animals", "mammals").unwrap();
        assert_eq!(again, EdgeId::new(1));
        assert_eq!(graph.edge_count(), 3);

        assert_eq!(
            graph.add_subcat("animals", "plants"),
            Err(GraphError::CategoryNotFound("plants".to_string()))
        );
    }

    #[test]
    fn test_adjacency() {
        let graph = sample();
        let animals = graph.get_by_key("animals").unwrap().id;
        let mammals = graph.get_by_key("mammals").unwrap().id;

        let children: Vec<NodeId> = graph.outgoing(animals).unwrap().iter().map(|e| e.child).collect();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0], mammals);

        let parents = graph.incoming(mammals).unwrap();
        assert_eq!(parents.len(), 1);
        assert_eq!(parents[0].parent, animals);

        assert_eq!(graph.outgoing(NodeId::new(99)), Err(GraphError::NodeNotFound(NodeId::new(99))));
    }

    #[test]
    fn test_shortest_path_records_titles() {
        let graph = sample();
        let path = graph
            .shortest_path("primates", "extinct_animals", Direction::Both, 15)
            .unwrap();
        assert_eq!(path.keys(), vec!["primates", "mammals", "animals", "extinct_animals"]);
        assert_eq!(
            path.edges,
            vec![
                PathEdge::new("Mammals", "subcat", "Primates"),
                PathEdge::new("Animals", "subcat", "Mammals"),
                PathEdge::new("Animals", "subcat", "Extinct animals"),
            ]
        );

        assert!(graph
            .shortest_path("primates", "extinct_animals", Direction::Outgoing, 16)
            .is_none());
        assert!(graph.shortest_path("primates", "unknown", Direction::Both, 15).is_none());
    }

    #[test]
    fn test_view_is_rebuilt_after_mutation() {
        let mut graph = sample();
        assert_eq!(graph.view().edge_count(), 3);

        graph.add_category("Plants", "plants");
        graph.add_subcat("plants", "extinct_animals").unwrap();
        let view = graph.view();
        assert_eq!(view.node_count, 5);
        assert_eq!(view.edge_count(), 4);
    }

    #[test]
    fn test_reach_follows_parents() {
        let graph = sample();
        let ancestors = graph.reach("primates", Direction::Incoming, 9);
        let keys: Vec<&str> = ancestors.iter().map(String::as_str).collect();
        assert_eq!(keys, vec!["primates", "mammals", "animals"]);

        assert!(graph.reach("unknown", Direction::Incoming, 9).is_empty());
    }
}
