//! MetapediaClient trait — the unified interface for embedded and remote modes

use async_trait::async_trait;
use crate::error::MetapediaResult;
use crate::models::ServerStatus;
use metapedia::resolver::{LookupKey, ResolutionResult};

/// Unified client interface for the Metapedia category path service.
///
/// Implemented by:
/// - `EmbeddedClient` — in-process, no network
/// - `RemoteClient` — connects to a running server via HTTP
#[async_trait]
pub trait MetapediaClient: Send + Sync {
    /// Resolve how `source` and `target` relate in namespace `lang`
    async fn category_path(
        &self,
        lang: &str,
        source: &str,
        target: &str,
    ) -> MetapediaResult<ResolutionResult>;

    /// Recently resolved lookups, oldest first
    async fn recent(&self) -> MetapediaResult<Vec<LookupKey>>;

    /// Get server status
    async fn status(&self) -> MetapediaResult<ServerStatus>;

    /// Ping the server
    async fn ping(&self) -> MetapediaResult<String>;
}
