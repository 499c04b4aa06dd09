//! HTTP API
//!
//! - `POST /metapedia/v1/category_path`: resolve `{lang, source, target}`
//! - `GET /metapedia/v1/category_path/recent`: recent unique lookups
//! - `GET /api/status`: health, cache and store status

pub mod handler;
pub mod server;

pub use handler::{ApiError, CategoryPathRequest};
pub use server::{router, AppState, HttpServer, SharedResolver};
