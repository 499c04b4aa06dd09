//! Category graph model
//!
//! This module implements the category graph data model with:
//! - Category nodes keyed by a folded title
//! - Directed `subcat` edges from parent to child category
//! - In-memory storage with a lazily built CSR view for traversal
//! - One graph per language namespace

pub mod catalog;
pub mod category;
pub mod path;
pub mod snapshot;
pub mod store;
pub mod types;

// Re-export main types
pub use catalog::{GraphCatalog, SharedGraph};
pub use category::{Category, SubcatEdge};
pub use path::{CategoryPath, CategoryRef, PathEdge};
pub use snapshot::{load_snapshot, Snapshot, SnapshotCategory};
pub use store::{CategoryGraph, GraphError, GraphResult};
pub use types::{fold_title, CategoryKey, EdgeId, EdgeType, Namespace, NodeId};
pub use metapedia_graph_algorithms::Direction;
