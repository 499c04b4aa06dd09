//! Error types for the Metapedia SDK

use thiserror::Error;

/// Errors that can occur when using the Metapedia SDK
#[derive(Error, Debug)]
pub enum MetapediaError {
    /// The server rejected or failed the request
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid lang, source or target (embedded mode)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The graph store could not answer (embedded mode)
    #[error("Store error: {0}")]
    Store(String),

    /// Connection error (remote mode)
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<metapedia::ResolverError> for MetapediaError {
    fn from(e: metapedia::ResolverError) -> Self {
        match e {
            metapedia::ResolverError::InvalidInput(msg) => MetapediaError::InvalidInput(msg),
            metapedia::ResolverError::Store(e) => MetapediaError::Store(e.to_string()),
        }
    }
}

impl From<metapedia::GraphError> for MetapediaError {
    fn from(e: metapedia::GraphError) -> Self {
        MetapediaError::InvalidInput(e.to_string())
    }
}

pub type MetapediaResult<T> = Result<T, MetapediaError>;
