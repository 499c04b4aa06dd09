//! Graph store backends
//!
//! `CategoryStore` is the narrow query contract the resolver runs against.
//! Implemented by:
//! - `MemoryStore`: in-process graphs loaded from snapshots
//! - `Neo4jStore`: a Neo4j server reached over its HTTP API

pub mod memory;
pub mod neo4j;

use crate::graph::{CategoryKey, CategoryPath, Namespace};
use async_trait::async_trait;
use indexmap::IndexSet;
use thiserror::Error;

pub use memory::MemoryStore;
pub use neo4j::{Neo4jConfig, Neo4jStore};

/// Failures of the graph store itself.
///
/// A query that simply finds nothing is not an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Connectivity, timeout or transport failure
    #[error("Graph store unavailable: {0}")]
    Unavailable(String),

    /// The store answered with something that could not be interpreted
    #[error("Graph store protocol error: {0}")]
    Protocol(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Shortest path ignoring edge direction, at most `max_hops` edges
    async fn shortest_undirected(
        &self,
        namespace: &Namespace,
        source: &CategoryKey,
        target: &CategoryKey,
        max_hops: usize,
    ) -> StoreResult<Option<CategoryPath>>;

    /// Shortest path following `subcat` edges from `source` to `target`
    async fn shortest_directed(
        &self,
        namespace: &Namespace,
        source: &CategoryKey,
        target: &CategoryKey,
        max_hops: usize,
    ) -> StoreResult<Option<CategoryPath>>;

    /// Keys reachable from `start` by walking edges back toward more general
    /// categories, at most `max_level` hops. Includes `start` when it exists.
    async fn ancestor_expansion(
        &self,
        namespace: &Namespace,
        start: &CategoryKey,
        max_level: usize,
    ) -> StoreResult<IndexSet<String>>;

    /// Health probe
    async fn ping(&self) -> StoreResult<()>;

    /// Short backend name for status output
    fn name(&self) -> &'static str;
}
