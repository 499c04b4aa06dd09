//! MemoryStore — `CategoryStore` over in-process graphs

use super::{CategoryStore, StoreResult};
use crate::graph::{
    load_snapshot, CategoryGraph, CategoryKey, CategoryPath, Direction, GraphCatalog,
    GraphResult, Namespace,
};
use async_trait::async_trait;
use indexmap::IndexSet;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// In-process store. Queries never fail; unknown namespaces and keys are
/// simply not found.
#[derive(Debug, Default)]
pub struct MemoryStore {
    catalog: Arc<GraphCatalog>,
}

impl MemoryStore {
    /// Create a store with an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store over an existing catalog
    pub fn with_catalog(catalog: Arc<GraphCatalog>) -> Self {
        Self { catalog }
    }

    /// Load one snapshot file per namespace
    pub fn from_snapshots(snapshots: &BTreeMap<String, PathBuf>) -> GraphResult<Self> {
        let catalog = GraphCatalog::new();
        for (lang, path) in snapshots {
            catalog.insert(Namespace::new(lang.clone()), load_snapshot(path)?);
        }
        Ok(Self::with_catalog(Arc::new(catalog)))
    }

    pub fn catalog(&self) -> &Arc<GraphCatalog> {
        &self.catalog
    }

    /// Install the graph of a namespace
    pub fn insert(&self, namespace: Namespace, graph: CategoryGraph) {
        self.catalog.insert(namespace, graph);
    }

    async fn path(
        &self,
        namespace: &Namespace,
        source: &CategoryKey,
        target: &CategoryKey,
        direction: Direction,
        max_hops: usize,
    ) -> Option<CategoryPath> {
        let graph = self.catalog.get(namespace)?;
        let graph = graph.read().await;
        let path = graph.shortest_path(source.as_str(), target.as_str(), direction, max_hops);
        debug!(
            "[{}] {:?} path {} -> {}: {:?} hops",
            namespace,
            direction,
            source,
            target,
            path.as_ref().map(CategoryPath::len)
        );
        path
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn shortest_undirected(
        &self,
        namespace: &Namespace,
        source: &CategoryKey,
        target: &CategoryKey,
        max_hops: usize,
    ) -> StoreResult<Option<CategoryPath>> {
        Ok(self.path(namespace, source, target, Direction::Both, max_hops).await)
    }

    async fn shortest_directed(
        &self,
        namespace: &Namespace,
        source: &CategoryKey,
        target: &CategoryKey,
        max_hops: usize,
    ) -> StoreResult<Option<CategoryPath>> {
        Ok(self.path(namespace, source, target, Direction::Outgoing, max_hops).await)
    }

    async fn ancestor_expansion(
        &self,
        namespace: &Namespace,
        start: &CategoryKey,
        max_level: usize,
    ) -> StoreResult<IndexSet<String>> {
        let Some(graph) = self.catalog.get(namespace) else {
            return Ok(IndexSet::new());
        };
        let graph = graph.read().await;
        Ok(graph.reach(start.as_str(), Direction::Incoming, max_level))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
