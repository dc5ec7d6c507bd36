//! In-memory bucket.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use super::{ObjectStore, PutObjectRequest, StoredObject};
use crate::error::StoreError;

// == Memory Object Store ==
/// A bucket held entirely in process memory.
#[derive(Debug)]
pub struct MemoryObjectStore {
    bucket: String,
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryObjectStore {
    /// Creates an empty bucket.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of objects in the bucket.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Returns true if the bucket holds no objects.
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_object(&self, request: PutObjectRequest) -> Result<(), StoreError> {
        debug!(bucket = %self.bucket, key = %request.key, size = request.body.len(), "put object");
        let key = request.key.clone();
        let object = StoredObject::from_request(request, Utc::now());
        self.objects.write().await.insert(key, object);
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<StoredObject, StoreError> {
        self.objects
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn delete_object(&self, key: &str) -> Result<(), StoreError> {
        debug!(bucket = %self.bucket, key, "delete object");
        match self.objects.write().await.remove(key) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(key.to_string())),
        }
    }

    async fn object_exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.objects.read().await.contains_key(key))
    }
}
