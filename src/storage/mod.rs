//! Storage Module
//!
//! The object store port the cache is written against, plus the bundled
//! bucket backends.

mod fs;
mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

pub use fs::FsObjectStore;
pub use memory::MemoryObjectStore;

/// User metadata attached to an object. Values are always strings.
pub type ObjectMetadata = BTreeMap<String, String>;

// == Access Policy ==
/// Canned access policy applied to an object on write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectAcl {
    #[default]
    Private,
}

impl ObjectAcl {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectAcl::Private => "private",
        }
    }
}

// == Requests and Objects ==
/// Everything needed to write one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutObjectRequest {
    pub key: String,
    pub body: Vec<u8>,
    pub metadata: ObjectMetadata,
    pub acl: ObjectAcl,
    pub content_type: String,
}

/// An object as read back from a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub metadata: ObjectMetadata,
    pub acl: ObjectAcl,
    pub content_type: String,
    pub last_modified: DateTime<Utc>,
}

impl StoredObject {
    /// Builds the stored form of a put request.
    pub(crate) fn from_request(request: PutObjectRequest, last_modified: DateTime<Utc>) -> Self {
        Self {
            body: request.body,
            metadata: request.metadata,
            acl: request.acl,
            content_type: request.content_type,
            last_modified,
        }
    }
}

// == Object Store Port ==
/// A client bound to a single bucket of a key-addressed object store.
///
/// Implementations report a missing object as [`StoreError::NotFound`] from
/// `get_object` and `delete_object`; every other variant is a real failure.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Name of the bucket this client addresses.
    fn bucket(&self) -> &str;

    /// Creates or replaces the object at `request.key`.
    async fn put_object(&self, request: PutObjectRequest) -> Result<(), StoreError>;

    /// Reads the object body and metadata.
    async fn get_object(&self, key: &str) -> Result<StoredObject, StoreError>;

    /// Removes the object.
    async fn delete_object(&self, key: &str) -> Result<(), StoreError>;

    /// Checks whether an object exists without reading it.
    async fn object_exists(&self, key: &str) -> Result<bool, StoreError>;
}
