//! HTTP server implementation for the category path API

use super::handler::{category_path_handler, recent_handler, root_handler, status_handler};
use crate::backend::CategoryStore;
use crate::config::ServerConfig;
use crate::resolver::{CategoryPathResolver, RecentLookups};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Resolver over whichever store the server was configured with
pub type SharedResolver = Arc<CategoryPathResolver<dyn CategoryStore>>;

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub resolver: SharedResolver,
    /// Accepted `lang` values
    pub namespaces: Arc<Vec<String>>,
    pub recent: Arc<RecentLookups>,
}

impl AppState {
    pub fn new(resolver: SharedResolver, namespaces: Vec<String>, recent_capacity: usize) -> Self {
        Self {
            resolver,
            namespaces: Arc::new(namespaces),
            recent: Arc::new(RecentLookups::new(recent_capacity)),
        }
    }
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/metapedia/v1/category_path", post(category_path_handler))
        .route("/metapedia/v1/category_path/recent", get(recent_handler))
        .route("/api/status", get(status_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// HTTP server for the category path API
pub struct HttpServer {
    state: AppState,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(state: AppState, config: ServerConfig) -> Self {
        Self { state, config }
    }

    /// Start the HTTP server
    pub async fn start(&self) -> std::io::Result<()> {
        let app = router(self.state.clone());

        let addr = format!("{}:{}", self.config.address, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        info!("Category path API available at http://{}", addr);

        axum::serve(listener, app).await
    }
}
