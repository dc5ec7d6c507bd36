//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

/// Request body for PUT /cache/:key
///
/// `value` is any JSON value; only strings are stored.
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The value to store
    pub value: Value,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl: Option<i64>,
}

/// Request body for POST /batch/get and POST /batch/delete
#[derive(Debug, Clone, Deserialize)]
pub struct KeysRequest {
    pub keys: Vec<String>,
}

/// Pairs for a batch write, either as an ordered list of `[key, value]`
/// pairs or as an object.
///
/// Object members are written in the order serde_json yields them, which is
/// sorted by key.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BatchValues {
    Pairs(Vec<(String, Value)>),
    Map(serde_json::Map<String, Value>),
}

impl BatchValues {
    pub fn into_pairs(self) -> Vec<(String, Value)> {
        match self {
            BatchValues::Pairs(pairs) => pairs,
            BatchValues::Map(map) => map.into_iter().collect(),
        }
    }
}

/// Request body for POST /batch/set
#[derive(Debug, Clone, Deserialize)]
pub struct SetMultipleRequest {
    pub values: BatchValues,
    /// Optional TTL in seconds, shared by every pair
    #[serde(default)]
    pub ttl: Option<i64>,
}
