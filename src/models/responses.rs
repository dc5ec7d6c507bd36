//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::HashMap;

use serde::Serialize;

/// Response body for GET /cache/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: String,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response body for PUT /cache/:key
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// The key that was written
    pub key: String,
    /// Whether the value was stored
    pub stored: bool,
}

impl SetResponse {
    pub fn new(key: impl Into<String>, stored: bool) -> Self {
        Self {
            key: key.into(),
            stored,
        }
    }
}

/// Response body for DELETE /cache/:key
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// The key that was targeted
    pub key: String,
    /// Whether an object was removed
    pub deleted: bool,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>, deleted: bool) -> Self {
        Self {
            key: key.into(),
            deleted,
        }
    }
}

/// Response body for POST /batch/get
///
/// Misses serialize as `null`.
#[derive(Debug, Clone, Serialize)]
pub struct GetMultipleResponse {
    pub values: HashMap<String, Option<String>>,
}

/// Response body for POST /batch/set
#[derive(Debug, Clone, Serialize)]
pub struct SetMultipleResponse {
    pub stored: bool,
}

/// Response body for POST /batch/delete
#[derive(Debug, Clone, Serialize)]
pub struct DeleteMultipleResponse {
    pub deleted: bool,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Bucket backing the cache
    pub bucket: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(bucket: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            bucket: bucket.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_response_serialize() {
        let resp = GetResponse::new("test_key", "test_value");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("test_key"));
        assert!(json.contains("test_value"));
    }

    #[test]
    fn test_set_response_serialize() {
        let resp = SetResponse::new("my_key", false);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["key"], "my_key");
        assert_eq!(json["stored"], false);
    }

    #[test]
    fn test_delete_response_serialize() {
        let resp = DeleteResponse::new("deleted_key", true);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["deleted"], true);
    }

    #[test]
    fn test_get_multiple_misses_are_null() {
        let mut values = HashMap::new();
        values.insert("hit".to_string(), Some("v".to_string()));
        values.insert("miss".to_string(), None);
        let json = serde_json::to_value(GetMultipleResponse { values }).unwrap();
        assert_eq!(json["values"]["hit"], "v");
        assert!(json["values"]["miss"].is_null());
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy("cache");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
        assert!(json.contains("cache"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
