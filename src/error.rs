//! Error types for the bucket cache
//!
//! Separates storage-layer failures from the errors the cache contract
//! surfaces to its callers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Store Error Enum ==
/// Failure reported by an object store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No object exists under the key
    #[error("No such key: {0}")]
    NotFound(String),

    /// The backend cannot address an object under this key
    #[error("Key not addressable by store: {0}")]
    InvalidKey(String),

    /// Any other backend failure
    #[error("Store backend failure: {0}")]
    Backend(String),

    /// Filesystem failure in a disk-backed bucket
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata sidecar could not be encoded or decoded
    #[error("Metadata error: {0}")]
    Metadata(#[from] serde_json::Error),
}

impl StoreError {
    /// True when the store reported that the object is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

// == Cache Error Enum ==
/// Errors raised by cache operations.
///
/// Store `NotFound` never reaches this type through the cache contract: it is
/// converted to a miss or a `false` result before returning.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key does not match the allowed key format
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),

    /// TTL given as a negative number of seconds
    #[error("Invalid TTL: {0} seconds")]
    InvalidTtl(i64),

    /// Failure from the underlying object store
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Operation not supported by a bucket-backed cache
    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidKey(_) | CacheError::InvalidTtl(_) => StatusCode::BAD_REQUEST,
            CacheError::Unsupported(_) => StatusCode::NOT_IMPLEMENTED,
            CacheError::Store(_) => StatusCode::BAD_GATEWAY,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_not_found_detection() {
        assert!(StoreError::NotFound("k".to_string()).is_not_found());
        assert!(!StoreError::Backend("boom".to_string()).is_not_found());
    }

    #[test]
    fn test_status_mapping() {
        let invalid = CacheError::InvalidKey("a b".to_string()).into_response();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let ttl = CacheError::InvalidTtl(-5).into_response();
        assert_eq!(ttl.status(), StatusCode::BAD_REQUEST);

        let unsupported = CacheError::Unsupported("clear").into_response();
        assert_eq!(unsupported.status(), StatusCode::NOT_IMPLEMENTED);

        let store = CacheError::from(StoreError::Backend("down".to_string())).into_response();
        assert_eq!(store.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_store_error_is_transparent() {
        let err = CacheError::from(StoreError::Backend("access denied".to_string()));
        assert_eq!(err.to_string(), "Store backend failure: access denied");
    }
}
