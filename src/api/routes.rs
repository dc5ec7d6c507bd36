//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, delete_handler, delete_multiple_handler, get_handler, get_multiple_handler,
    has_handler, health_handler, set_handler, set_multiple_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /cache/:key` - Retrieve a value
/// - `PUT /cache/:key` - Store a value with optional TTL
/// - `DELETE /cache/:key` - Delete a value
/// - `GET /cache/:key/exists` - Check whether an object is stored
/// - `DELETE /cache` - Clear (unsupported, 501)
/// - `POST /batch/get` - Retrieve several values
/// - `POST /batch/set` - Store several values
/// - `POST /batch/delete` - Delete several values
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/cache", delete(clear_handler))
        .route(
            "/cache/:key",
            get(get_handler).put(set_handler).delete(delete_handler),
        )
        .route("/cache/:key/exists", get(has_handler))
        .route("/batch/get", post(get_multiple_handler))
        .route("/batch/set", post(set_multiple_handler))
        .route("/batch/delete", post(delete_multiple_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
