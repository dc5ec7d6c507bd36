//! API Module
//!
//! HTTP handlers and routing exposing the bucket cache as a REST API.
//!
//! # Endpoints
//! - `GET|PUT|DELETE /cache/:key` - Single-key operations
//! - `GET /cache/:key/exists` - Existence check
//! - `DELETE /cache` - Clear (always 501)
//! - `POST /batch/{get,set,delete}` - Batch operations
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
