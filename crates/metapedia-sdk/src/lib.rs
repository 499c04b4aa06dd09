//! Metapedia SDK — Client library for the category path service
//!
//! Provides two client implementations:
//!
//! - **`EmbeddedClient`** — In-process, no network. Runs a
//!   `CategoryPathResolver` over in-memory graphs. Ideal for tests and
//!   offline analysis of snapshot files.
//!
//! - **`RemoteClient`** — Connects to a running Metapedia server via HTTP.
//!
//! Both implement the `MetapediaClient` trait for a unified API.
//!
//! # Quick Start
//!
//! ```rust
//! use metapedia_sdk::{CategoryGraph, EmbeddedClient, MetapediaClient};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut graph = CategoryGraph::new();
//!     graph.add_category("Animals", "animals");
//!     graph.add_category("Mammals", "mammals");
//!     graph.add_subcat("animals", "mammals").unwrap();
//!
//!     let client = EmbeddedClient::new();
//!     client.insert_graph("en", graph);
//!
//!     let result = client.category_path("en", "animals", "mammals").await.unwrap();
//!     println!("line path: {:?}", result.d2.map(|p| p.len()));
//! }
//! ```

pub mod client;
pub mod embedded;
pub mod error;
pub mod models;
pub mod remote;

pub use client::MetapediaClient;
pub use embedded::EmbeddedClient;
pub use error::{MetapediaError, MetapediaResult};
pub use models::{ServerStatus, StoreStatus};
pub use remote::RemoteClient;

// Result and graph types (re-exported from metapedia core)
pub use metapedia::graph::{CategoryGraph, CategoryPath, CategoryRef, PathEdge};
pub use metapedia::resolver::{
    CacheStats, LookupKey, ResolutionResult, ResolverConfig, StitchedPath, TitlePath,
};

pub use metapedia::VERSION;
