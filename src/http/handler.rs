//! HTTP handlers for the category path API

use super::server::AppState;
use crate::graph::{CategoryKey, GraphError, Namespace};
use crate::resolver::{LookupKey, ResolutionResult, ResolverError};
use crate::backend::StoreError;
use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

/// Request body of `POST /metapedia/v1/category_path`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CategoryPathRequest {
    pub lang: String,
    pub source: String,
    pub target: String,
}

/// Errors surfaced to HTTP callers
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    StoreUnavailable(String),

    #[error("{0}")]
    StoreProtocol(String),
}

impl From<GraphError> for ApiError {
    fn from(e: GraphError) -> Self {
        ApiError::InvalidInput(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

impl From<ResolverError> for ApiError {
    fn from(e: ResolverError) -> Self {
        match e {
            ResolverError::InvalidInput(msg) => ApiError::InvalidInput(msg),
            ResolverError::Store(StoreError::Unavailable(msg)) => ApiError::StoreUnavailable(msg),
            ResolverError::Store(StoreError::Protocol(msg)) => ApiError::StoreProtocol(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::StoreProtocol(_) => StatusCode::BAD_GATEWAY,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Handler for category path queries
pub async fn category_path_handler(
    State(state): State<AppState>,
    payload: Result<Json<CategoryPathRequest>, JsonRejection>,
) -> Result<Json<ResolutionResult>, ApiError> {
    let Json(payload) = payload?;
    let namespace = Namespace::parse(&payload.lang, &state.namespaces)?;
    let source = CategoryKey::new(payload.source.clone())?;
    let target = CategoryKey::new(payload.target.clone())?;

    let result = state
        .resolver
        .resolve(&source, &target, &namespace)
        .await
        .inspect_err(|e| warn!("category_path {:?} failed: {}", payload, e))?;

    state
        .recent
        .record(LookupKey::new(payload.lang, payload.source, payload.target));

    Ok(Json(ResolutionResult::clone(&result)))
}

/// Handler for recently resolved lookups, oldest first
pub async fn recent_handler(State(state): State<AppState>) -> Json<Vec<LookupKey>> {
    Json(state.recent.snapshot())
}

/// Handler for system status
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.resolver.store();
    let (status, store_error) = match store.ping().await {
        Ok(()) => ("healthy", None),
        Err(e) => ("degraded", Some(e.to_string())),
    };
    Json(json!({
        "status": status,
        "version": crate::VERSION,
        "namespaces": &*state.namespaces,
        "cache": state.resolver.cache().stats(),
        "recent": state.recent.len(),
        "store": {
            "backend": store.name(),
            "error": store_error,
        },
    }))
}

/// Root probe
pub async fn root_handler() -> impl IntoResponse {
    Json(json!({ "Hello": "World" }))
}
