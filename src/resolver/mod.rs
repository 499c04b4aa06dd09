//! Category path resolver
//!
//! Given two categories of one namespace, collects every available
//! description of how they relate:
//!
//! 1. `d1`: undirected shortest path (hop cap 15)
//! 2. `d2`: directed line path source -> target (hop cap 16)
//! 3. `d3`: directed line path target -> source (hop cap 16)
//! 4. `d4s`: only when `d2` and `d3` are both empty: expand ancestors of
//!    both sides level by level (up to 9), and for every shared ancestor
//!    stitch its two line paths into one source .. ancestor .. target walk.
//!
//! The resolver never picks a single answer; the bundle goes to the caller.
//! When several equally short paths exist, which one is returned depends on
//! the store's traversal order.

pub mod cache;
pub mod recent;
pub mod result;

use crate::backend::{CategoryStore, StoreError, StoreResult};
use crate::graph::{CategoryKey, GraphError, Namespace};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use cache::{CacheKey, CacheStats, ResolutionCache};
pub use recent::{LookupKey, RecentLookups};
pub use result::{ResolutionResult, StitchedPath, TitlePath};

/// Resolver errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolverError {
    /// Rejected before any store access
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The graph store could not answer
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<GraphError> for ResolverError {
    fn from(e: GraphError) -> Self {
        ResolverError::InvalidInput(e.to_string())
    }
}

pub type ResolverResult<T> = Result<T, ResolverError>;

/// Traversal bounds and cache sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Hop cap of the undirected shortest path (`d1`)
    pub undirected_max_hops: usize,
    /// Hop cap of directed line paths (`d2`, `d3` and stitching)
    pub directed_max_hops: usize,
    /// Deepest ancestor expansion level tried by the fallback
    pub ancestor_max_level: usize,
    /// Cap on stitched paths per query; `None` stitches every shared ancestor
    pub max_stitched_paths: Option<usize>,
    /// Number of memoized results
    pub cache_capacity: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            undirected_max_hops: 15,
            directed_max_hops: 16,
            ancestor_max_level: 9,
            max_stitched_paths: Some(10),
            cache_capacity: 100,
        }
    }
}

/// Resolves category relationships against a `CategoryStore`
pub struct CategoryPathResolver<S: ?Sized> {
    store: Arc<S>,
    config: ResolverConfig,
    cache: ResolutionCache,
}

impl<S: CategoryStore + ?Sized> CategoryPathResolver<S> {
    pub fn new(store: Arc<S>, config: ResolverConfig) -> Self {
        info!(
            "Resolver ready (store: {}, hops: {}/{}, ancestor levels: {}, cache: {})",
            store.name(),
            config.undirected_max_hops,
            config.directed_max_hops,
            config.ancestor_max_level,
            config.cache_capacity
        );
        let cache = ResolutionCache::new(config.cache_capacity);
        Self { store, config, cache }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    /// Resolve through the cache. Failed resolutions are not cached.
    pub async fn resolve(
        &self,
        source: &CategoryKey,
        target: &CategoryKey,
        namespace: &Namespace,
    ) -> ResolverResult<Arc<ResolutionResult>> {
        let key = CacheKey::new(namespace, source, target);
        if let Some(hit) = self.cache.get(&key) {
            debug!("[{}] cache hit {} -> {}", namespace, source, target);
            return Ok(hit);
        }

        let generation = self.cache.generation();
        let result = Arc::new(self.compute(source, target, namespace).await?);
        if !self.cache.put_if_current(key, Arc::clone(&result), generation) {
            debug!("[{}] cache cleared during {} -> {}, result not stored", namespace, source, target);
        }
        Ok(result)
    }

    /// Run every query, bypassing the cache
    pub async fn compute(
        &self,
        source: &CategoryKey,
        target: &CategoryKey,
        namespace: &Namespace,
    ) -> ResolverResult<ResolutionResult> {
        let store = &*self.store;
        let directed = self.config.directed_max_hops;

        let (d1, d2, d3) = tokio::try_join!(
            store.shortest_undirected(namespace, source, target, self.config.undirected_max_hops),
            store.shortest_directed(namespace, source, target, directed),
            store.shortest_directed(namespace, target, source, directed),
        )
        .inspect_err(|e| warn!("[{}] {} -> {} failed: {}", namespace, source, target, e))?;

        let d4s = if d2.is_none() && d3.is_none() {
            let ancestors = self.common_ancestors(source, target, namespace).await?;
            Some(self.stitch_all(&ancestors, source, target, namespace).await?)
        } else {
            None
        };

        debug!(
            "[{}] {} -> {}: d1={:?} d2={:?} d3={:?} d4s={:?}",
            namespace,
            source,
            target,
            d1.as_ref().map(|p| p.len()),
            d2.as_ref().map(|p| p.len()),
            d3.as_ref().map(|p| p.len()),
            d4s.as_ref().map(Vec::len)
        );

        Ok(ResolutionResult {
            d1: d1.map(TitlePath::from),
            d2,
            d3,
            d4s,
        })
    }

    /// Shared ancestors at the first level where the two expansions meet,
    /// without `source` and `target`, in source-side discovery order.
    async fn common_ancestors(
        &self,
        source: &CategoryKey,
        target: &CategoryKey,
        namespace: &Namespace,
    ) -> StoreResult<Vec<CategoryKey>> {
        let store = &*self.store;
        let mut previous = (0, 0);

        for level in 1..=self.config.ancestor_max_level {
            let (from_source, from_target) = tokio::try_join!(
                store.ancestor_expansion(namespace, source, level),
                store.ancestor_expansion(namespace, target, level),
            )?;

            let shared: Vec<&String> = from_source
                .iter()
                .filter(|key| from_target.contains(key.as_str()))
                .collect();

            if !shared.is_empty() {
                debug!("[{}] {} shared ancestors at level {}", namespace, shared.len(), level);
                let ancestors = shared
                    .into_iter()
                    .filter(|key| key.as_str() != source.as_str() && key.as_str() != target.as_str())
                    .filter_map(|key| CategoryKey::new(key.clone()).ok())
                    .collect();
                return Ok(ancestors);
            }

            // Expansion is monotonic: once neither side grows, deeper levels add nothing
            let sizes = (from_source.len(), from_target.len());
            if sizes == previous {
                debug!("[{}] ancestor expansion saturated at level {}", namespace, level);
                break;
            }
            previous = sizes;
        }

        Ok(Vec::new())
    }

    /// Stitch ancestors in order until `max_stitched_paths` paths exist.
    /// Ancestors with no line path to either side are skipped and do not
    /// count against the cap.
    async fn stitch_all(
        &self,
        ancestors: &[CategoryKey],
        source: &CategoryKey,
        target: &CategoryKey,
        namespace: &Namespace,
    ) -> StoreResult<Vec<StitchedPath>> {
        let store = &*self.store;
        let hops = self.config.directed_max_hops;
        let cap = self.config.max_stitched_paths.unwrap_or(ancestors.len());

        let mut stitched = Vec::new();
        for batch in ancestors.chunks(cap.max(1)) {
            if stitched.len() >= cap {
                break;
            }
            let halves = try_join_all(batch.iter().map(|ancestor| async move {
                tokio::try_join!(
                    store.shortest_directed(namespace, ancestor, source, hops),
                    store.shortest_directed(namespace, ancestor, target, hops),
                )
            }))
            .await?;

            stitched.extend(
                halves
                    .into_iter()
                    .filter_map(|(to_source, to_target)| StitchedPath::stitch(to_source?, to_target?)),
            );
        }
        stitched.truncate(cap);
        Ok(stitched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryStore;
    use crate::graph::CategoryGraph;

    fn key(s: &str) -> CategoryKey {
        CategoryKey::new(s).unwrap()
    }

    fn resolver(edges: &[(&str, &str)], config: ResolverConfig) -> CategoryPathResolver<MemoryStore> {
        let mut graph = CategoryGraph::new();
        for (parent, child) in edges {
            graph.add_category(parent.to_uppercase(), *parent);
            graph.add_category(child.to_uppercase(), *child);
        }
        for (parent, child) in edges {
            graph.add_subcat(parent, child).unwrap();
        }
        let store = MemoryStore::new();
        store.insert(Namespace::new("en"), graph);
        CategoryPathResolver::new(Arc::new(store), config)
    }

    #[tokio::test]
    async fn test_stitch_cap() {
        // four shared parents of a and b
        let edges: Vec<(&str, &str)> = ["p1", "p2", "p3", "p4"]
            .iter()
            .flat_map(|p| [(*p, "a"), (*p, "b")])
            .collect();
        let config = ResolverConfig { max_stitched_paths: Some(2), ..Default::default() };
        let result = resolver(&edges, config)
            .compute(&key("a"), &key("b"), &Namespace::new("en"))
            .await
            .unwrap();
        let d4s = result.d4s.unwrap();
        assert_eq!(d4s.len(), 2);
        assert_eq!(d4s[0].ancestor.f_title, "p1");
        assert_eq!(d4s[1].ancestor.f_title, "p2");

        let unbounded = ResolverConfig { max_stitched_paths: None, ..Default::default() };
        let result = resolver(&edges, unbounded)
            .compute(&key("a"), &key("b"), &Namespace::new("en"))
            .await
            .unwrap();
        assert_eq!(result.d4s.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_fallback_finds_deeper_ancestor() {
        // root -> x -> a, root -> y -> b
        let edges = [("root", "x"), ("x", "a"), ("root", "y"), ("y", "b")];
        let result = resolver(&edges, ResolverConfig::default())
            .compute(&key("a"), &key("b"), &Namespace::new("en"))
            .await
            .unwrap();

        let d4s = result.d4s.unwrap();
        assert_eq!(d4s.len(), 1);
        assert_eq!(d4s[0].path.keys(), vec!["a", "x", "root", "y", "b"]);
    }

    #[tokio::test]
    async fn test_ancestor_level_cap() {
        // ancestor at level 2, but only one level allowed
        let edges = [("root", "x"), ("x", "a"), ("root", "y"), ("y", "b")];
        let config = ResolverConfig { ancestor_max_level: 1, ..Default::default() };
        let result = resolver(&edges, config)
            .compute(&key("a"), &key("b"), &Namespace::new("en"))
            .await
            .unwrap();
        assert_eq!(result.d4s, Some(vec![]));
    }

    #[test]
    fn test_graph_error_is_invalid_input() {
        let err: ResolverError = GraphError::EmptyKey.into();
        assert!(matches!(err, ResolverError::InvalidInput(_)));
    }
}
