use anyhow::Context;
use metapedia::backend::{CategoryStore, MemoryStore, Neo4jStore};
use metapedia::config::{Config, StoreConfig};
use metapedia::http::{AppState, HttpServer};
use metapedia::resolver::CategoryPathResolver;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    metapedia::init_logging();

    let config = Config::from_env().context("loading configuration")?;
    info!("Metapedia category path service v{}", metapedia::version());

    let store = open_store(&config.store)?;
    if let Err(e) = store.ping().await {
        warn!("Graph store not reachable at startup: {}", e);
    }

    let resolver = Arc::new(CategoryPathResolver::new(store, config.resolver.clone()));
    let state = AppState::new(resolver, config.namespaces.clone(), config.recent_capacity);

    HttpServer::new(state, config.server.clone())
        .start()
        .await
        .context("HTTP server failed")
}

fn open_store(config: &StoreConfig) -> anyhow::Result<Arc<dyn CategoryStore>> {
    match config {
        StoreConfig::Memory { snapshots } => {
            let store = MemoryStore::from_snapshots(snapshots).context("loading snapshots")?;
            for ns in store.catalog().namespaces() {
                info!("Loaded namespace {}", ns);
            }
            if snapshots.is_empty() {
                warn!("No snapshots configured; every lookup will come back empty");
            }
            Ok(Arc::new(store))
        }
        StoreConfig::Neo4j(neo4j) => {
            info!("Using Neo4j at {}", neo4j.url);
            Ok(Arc::new(Neo4jStore::new(neo4j.clone())?))
        }
    }
}
