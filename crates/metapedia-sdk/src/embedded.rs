//! EmbeddedClient — in-process category path client
//!
//! Runs the resolver over a `MemoryStore` directly, no network needed.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use metapedia::backend::{CategoryStore, MemoryStore};
use metapedia::graph::{load_snapshot, CategoryGraph, CategoryKey, Namespace};
use metapedia::resolver::{
    CategoryPathResolver, LookupKey, RecentLookups, ResolutionResult, ResolverConfig,
};

use crate::client::MetapediaClient;
use crate::error::MetapediaResult;
use crate::models::{ServerStatus, StoreStatus};

/// In-process client over in-memory category graphs.
///
/// Every namespace with an installed graph is accepted as `lang`.
pub struct EmbeddedClient {
    resolver: CategoryPathResolver<MemoryStore>,
    recent: RecentLookups,
}

impl EmbeddedClient {
    /// Create a new EmbeddedClient with no graphs and default bounds
    pub fn new() -> Self {
        Self::with_config(ResolverConfig::default())
    }

    pub fn with_config(config: ResolverConfig) -> Self {
        Self::with_store(MemoryStore::new(), config)
    }

    /// Create an EmbeddedClient over an existing store
    pub fn with_store(store: MemoryStore, config: ResolverConfig) -> Self {
        Self {
            resolver: CategoryPathResolver::new(Arc::new(store), config),
            recent: RecentLookups::default(),
        }
    }

    /// Get a reference to the underlying store
    pub fn store(&self) -> &Arc<MemoryStore> {
        self.resolver.store()
    }

    /// Install or replace the graph of `lang`. Cached results are dropped,
    /// including results of lookups still running against the old graph.
    pub fn insert_graph(&self, lang: &str, graph: CategoryGraph) {
        self.store().insert(Namespace::new(lang), graph);
        self.resolver.cache().clear();
    }

    /// Load a snapshot file as the graph of `lang`
    pub fn load_snapshot(&self, lang: &str, path: impl AsRef<Path>) -> MetapediaResult<()> {
        let graph = load_snapshot(path)?;
        self.insert_graph(lang, graph);
        Ok(())
    }

    fn namespaces(&self) -> Vec<String> {
        self.store()
            .catalog()
            .namespaces()
            .into_iter()
            .map(|ns| ns.to_string())
            .collect()
    }
}

impl Default for EmbeddedClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetapediaClient for EmbeddedClient {
    async fn category_path(
        &self,
        lang: &str,
        source: &str,
        target: &str,
    ) -> MetapediaResult<ResolutionResult> {
        let namespace = Namespace::parse(lang, &self.namespaces())?;
        let source_key = CategoryKey::new(source)?;
        let target_key = CategoryKey::new(target)?;

        let result = self.resolver.resolve(&source_key, &target_key, &namespace).await?;
        self.recent.record(LookupKey::new(lang, source, target));
        Ok(ResolutionResult::clone(&result))
    }

    async fn recent(&self) -> MetapediaResult<Vec<LookupKey>> {
        Ok(self.recent.snapshot())
    }

    async fn status(&self) -> MetapediaResult<ServerStatus> {
        Ok(ServerStatus {
            status: "healthy".to_string(),
            version: metapedia::VERSION.to_string(),
            namespaces: self.namespaces(),
            cache: self.resolver.cache().stats(),
            recent: self.recent.len(),
            store: StoreStatus {
                backend: self.store().name().to_string(),
                error: None,
            },
        })
    }

    async fn ping(&self) -> MetapediaResult<String> {
        Ok("PONG".to_string())
    }
}
