//! Metapedia category path service
//!
//! Explains how two categories of a language-partitioned category graph
//! relate. Every query returns a bundle of up to four descriptions:
//!
//! - `d1`: the undirected shortest path
//! - `d2` / `d3`: directed line paths in either direction
//! - `d4s`: when neither line path exists, paths stitched through the
//!   nearest common ancestors
//!
//! ## Layout
//!
//! - [`graph`]: in-memory category graphs, snapshots and namespace catalog
//! - [`backend`]: the `CategoryStore` contract with memory and Neo4j backends
//! - [`resolver`]: query orchestration, result cache and recent lookups
//! - [`http`]: the axum JSON API
//! - [`config`]: YAML configuration with env overrides
//!
//! ## Example Usage
//!
//! ```rust
//! use metapedia::backend::MemoryStore;
//! use metapedia::graph::{CategoryGraph, CategoryKey, Namespace};
//! use metapedia::resolver::{CategoryPathResolver, ResolverConfig};
//! use std::sync::Arc;
//!
//! # tokio_test_block(async {
//! let mut graph = CategoryGraph::new();
//! graph.add_category("Animals", "animals");
//! graph.add_category("Mammals", "mammals");
//! graph.add_subcat("animals", "mammals").unwrap();
//!
//! let store = MemoryStore::new();
//! store.insert(Namespace::new("en"), graph);
//!
//! let resolver = CategoryPathResolver::new(Arc::new(store), ResolverConfig::default());
//! let result = resolver
//!     .resolve(
//!         &CategoryKey::new("animals").unwrap(),
//!         &CategoryKey::new("mammals").unwrap(),
//!         &Namespace::new("en"),
//!     )
//!     .await
//!     .unwrap();
//! assert_eq!(result.d2.as_ref().unwrap().titles(), vec!["Animals", "Mammals"]);
//! # });
//! # fn tokio_test_block(f: impl std::future::Future<Output = ()>) {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod graph;
pub mod http;
pub mod resolver;

pub use backend::{CategoryStore, MemoryStore, Neo4jConfig, Neo4jStore, StoreError};
pub use config::{Config, ConfigError, ServerConfig, StoreConfig};
pub use graph::{
    fold_title, CategoryGraph, CategoryKey, CategoryPath, CategoryRef, GraphCatalog, GraphError,
    Namespace, PathEdge,
};
pub use http::{router, AppState, HttpServer};
pub use resolver::{
    CategoryPathResolver, ResolutionResult, ResolverConfig, ResolverError, StitchedPath, TitlePath,
};

use tracing_subscriber::EnvFilter;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

/// Install the global `tracing` subscriber, filtered by `RUST_LOG`
/// (default `info`). Later calls are ignored.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.3.0");
    }
}
