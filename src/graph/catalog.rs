//! Per-namespace collection of category graphs

use super::store::CategoryGraph;
use super::types::Namespace;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::info;

/// Shared handle to one namespace's graph
pub type SharedGraph = Arc<tokio::sync::RwLock<CategoryGraph>>;

/// Holds one `CategoryGraph` per namespace
///
/// A namespace that was never loaded has no graph; readers treat it as an
/// empty graph.
#[derive(Debug, Default)]
pub struct GraphCatalog {
    graphs: RwLock<HashMap<Namespace, SharedGraph>>,
}

impl GraphCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install (or replace) the graph of a namespace
    pub fn insert(&self, namespace: Namespace, graph: CategoryGraph) -> SharedGraph {
        info!(
            "Installing graph for namespace '{}' ({} categories, {} edges)",
            namespace,
            graph.category_count(),
            graph.edge_count()
        );
        let shared = Arc::new(tokio::sync::RwLock::new(graph));
        let mut graphs = self.graphs.write().unwrap_or_else(|e| e.into_inner());
        graphs.insert(namespace, Arc::clone(&shared));
        shared
    }

    /// Graph of a namespace, if one was loaded
    pub fn get(&self, namespace: &Namespace) -> Option<SharedGraph> {
        let graphs = self.graphs.read().unwrap_or_else(|e| e.into_inner());
        graphs.get(namespace).cloned()
    }

    /// Loaded namespaces, sorted
    pub fn namespaces(&self) -> Vec<Namespace> {
        let graphs = self.graphs.read().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<Namespace> = graphs.keys().cloned().collect();
        names.sort();
        names
    }
}
