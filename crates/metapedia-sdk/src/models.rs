//! Data models for the Metapedia SDK
//!
//! Response structures of `/api/status`, shared by EmbeddedClient and
//! RemoteClient. Resolution results reuse the core types.

use metapedia::resolver::CacheStats;
use serde::{Deserialize, Serialize};

/// Server status information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerStatus {
    /// `healthy` when the store answers its probe, else `degraded`
    pub status: String,
    /// Server version
    pub version: String,
    /// Accepted `lang` values
    pub namespaces: Vec<String>,
    /// Result cache counters
    pub cache: CacheStats,
    /// Number of remembered recent lookups
    pub recent: usize,
    pub store: StoreStatus,
}

impl ServerStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Graph store backend status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStatus {
    /// Backend name (`memory`, `neo4j`)
    pub backend: String,
    /// Probe failure, if any
    pub error: Option<String>,
}
