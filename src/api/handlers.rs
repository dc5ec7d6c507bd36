//! API Handlers
//!
//! HTTP request handlers exposing the cache operations.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::cache::{ObjectStoreCache, Ttl};
use crate::config::{Config, StoreBackend};
use crate::error::{Result, StoreError};
use crate::models::{
    DeleteMultipleResponse, DeleteResponse, ErrorResponse, GetMultipleResponse, GetResponse,
    HealthResponse, KeysRequest, SetMultipleRequest, SetMultipleResponse, SetRequest, SetResponse,
};
use crate::storage::{FsObjectStore, MemoryObjectStore, ObjectStore};

/// Application state shared across all handlers.
///
/// The cache is stateless and cheap to clone, so no lock is needed.
#[derive(Clone, Debug)]
pub struct AppState {
    pub cache: ObjectStoreCache,
}

impl AppState {
    /// Creates a new AppState around the given cache.
    pub fn new(cache: ObjectStoreCache) -> Self {
        Self { cache }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Opens the configured bucket backend and pairs it with the system clock.
    pub async fn from_config(config: &Config) -> std::result::Result<Self, StoreError> {
        let store: Arc<dyn ObjectStore> = match config.backend {
            StoreBackend::Memory => Arc::new(MemoryObjectStore::new(config.bucket.clone())),
            StoreBackend::Filesystem => {
                Arc::new(FsObjectStore::open(&config.store_root, config.bucket.clone()).await?)
            }
        };
        Ok(Self::new(ObjectStoreCache::with_system_clock(store)))
    }
}

/// Handler for GET /cache/:key
///
/// Responds 404 for absent and expired entries alike.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response> {
    let value: Option<String> = state.cache.get(&key, None).await?;

    Ok(match value {
        Some(value) => Json(GetResponse::new(key, value)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("Key not found: {}", key))),
        )
            .into_response(),
    })
}

/// Handler for PUT /cache/:key
///
/// A soft write failure still answers 200 with `stored: false`.
pub async fn set_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    let stored = state
        .cache
        .set(&key, req.value, req.ttl.map(Ttl::Seconds))
        .await?;

    Ok(Json(SetResponse::new(key, stored)))
}

/// Handler for DELETE /cache/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let deleted = state.cache.delete(&key).await?;

    Ok(Json(DeleteResponse::new(key, deleted)))
}

/// Handler for GET /cache/:key/exists
///
/// Reports stored objects even when they are past their expiry.
pub async fn has_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let exists = state.cache.has(&key).await?;

    Ok(Json(json!({ "key": key, "exists": exists })))
}

/// Handler for DELETE /cache
///
/// Clearing a bucket is not supported; always answers 501.
pub async fn clear_handler(State(state): State<AppState>) -> Result<StatusCode> {
    state.cache.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST /batch/get
pub async fn get_multiple_handler(
    State(state): State<AppState>,
    Json(req): Json<KeysRequest>,
) -> Result<Json<GetMultipleResponse>> {
    let values = state.cache.get_multiple(&req.keys, None).await?;

    Ok(Json(GetMultipleResponse { values }))
}

/// Handler for POST /batch/set
pub async fn set_multiple_handler(
    State(state): State<AppState>,
    Json(req): Json<SetMultipleRequest>,
) -> Result<Json<SetMultipleResponse>> {
    let stored = state
        .cache
        .set_multiple(req.values.into_pairs(), req.ttl.map(Ttl::Seconds))
        .await?;

    Ok(Json(SetMultipleResponse { stored }))
}

/// Handler for POST /batch/delete
pub async fn delete_multiple_handler(
    State(state): State<AppState>,
    Json(req): Json<KeysRequest>,
) -> Result<Json<DeleteMultipleResponse>> {
    let deleted = state.cache.delete_multiple(&req.keys).await?;

    Ok(Json(DeleteMultipleResponse { deleted }))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.cache.bucket()))
}
