//! Object Store Cache Module
//!
//! Translates cache operations into object store requests and interprets the
//! store's answers as cache outcomes.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheKey, Ttl};
use crate::clock::{Clock, SystemClock};
use crate::error::{CacheError, Result};
use crate::storage::ObjectStore;

// == Set Outcome ==
/// What happened to a single write.
///
/// Only an invalid key or a negative TTL is an error for `set`; every
/// variant here is a completed call that [`ObjectStoreCache::set`] reports as a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// The object was written
    Stored,
    /// The value was not a string; nothing was written
    TypeMismatch,
    /// The TTL could not be resolved to a timestamp; nothing was written
    TtlOutOfRange,
    /// The store rejected the write
    StoreFailed,
}

impl SetOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, SetOutcome::Stored)
    }
}

// == Object Store Cache ==
/// Cache whose entries are objects in a single bucket.
///
/// Holds no state of its own: every call goes straight to the store, one
/// request at a time, and batch operations are neither atomic nor rolled
/// back on failure.
#[derive(Clone)]
pub struct ObjectStoreCache {
    store: Arc<dyn ObjectStore>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for ObjectStoreCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStoreCache")
            .field("bucket", &self.store.bucket())
            .finish_non_exhaustive()
    }
}

impl ObjectStoreCache {
    // == Constructor ==
    /// Creates a cache over `store`, evaluating expiry against `clock`.
    pub fn new(store: Arc<dyn ObjectStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Creates a cache over `store` using wall-clock time.
    pub fn with_system_clock(store: Arc<dyn ObjectStore>) -> Self {
        Self::new(store, Arc::new(SystemClock))
    }

    /// Bucket the cache writes into.
    pub fn bucket(&self) -> &str {
        self.store.bucket()
    }

    // == Lookup ==
    /// Reads the live entry for `key`.
    ///
    /// `Ok(None)` when the object is absent or logically expired. Expired
    /// objects are left in place.
    pub async fn lookup(&self, key: &str) -> Result<Option<CacheEntry>> {
        let key = CacheKey::parse(key)?;

        let object = match self.store.get_object(key.as_str()).await {
            Ok(object) => object,
            Err(err) if err.is_not_found() => {
                debug!(key = %key, "cache miss");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let entry = CacheEntry::from_object(object);
        if entry.is_expired(self.clock.now()) {
            debug!(key = %key, expires_at = ?entry.expires_at, "cache entry expired");
            return Ok(None);
        }

        Ok(Some(entry))
    }

    // == Get ==
    /// Returns the value for `key`, or `default` on a miss or expired entry.
    ///
    /// Store failures other than "not found" are returned as errors.
    pub async fn get<D>(&self, key: &str, default: D) -> Result<D>
    where
        D: From<String>,
    {
        Ok(match self.lookup(key).await? {
            Some(entry) => D::from(entry.value),
            None => default,
        })
    }

    // == Set ==
    /// Stores `value` under `key`, expiring after `ttl` if given.
    ///
    /// Returns `Ok(false)` when the value is not a string or the write fails.
    /// An invalid key or a negative [`Ttl::Seconds`] is an error.
    pub async fn set(&self, key: &str, value: impl Into<Value>, ttl: Option<Ttl>) -> Result<bool> {
        Ok(self.try_set(key, value, ttl).await?.is_stored())
    }

    /// Like [`set`](Self::set) but reports why a write did not happen.
    pub async fn try_set(
        &self,
        key: &str,
        value: impl Into<Value>,
        ttl: Option<Ttl>,
    ) -> Result<SetOutcome> {
        let key = CacheKey::parse(key)?;

        let value: Value = value.into();
        let Value::String(value) = value else {
            debug!(key = %key, "refusing non-string value");
            return Ok(SetOutcome::TypeMismatch);
        };

        if let Some(Ttl::Seconds(secs)) = ttl {
            if secs < 0 {
                return Err(CacheError::InvalidTtl(secs));
            }
        }

        let expires_at = match ttl {
            Some(ttl) => match ttl.expires_at(self.clock.now()) {
                Some(expires_at) => Some(expires_at),
                None => {
                    warn!(key = %key, ?ttl, "ttl out of range, entry not written");
                    return Ok(SetOutcome::TtlOutOfRange);
                }
            },
            None => None,
        };

        let request = CacheEntry::new(value, expires_at).into_put_request(key.as_str());
        match self.store.put_object(request).await {
            Ok(()) => {
                debug!(key = %key, ?expires_at, "cache entry written");
                Ok(SetOutcome::Stored)
            }
            Err(err) => {
                warn!(key = %key, bucket = self.store.bucket(), error = %err, "cache write failed");
                Ok(SetOutcome::StoreFailed)
            }
        }
    }

    // == Delete ==
    /// Removes `key`. `Ok(false)` if there was nothing to remove.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let key = CacheKey::parse(key)?;

        match self.store.delete_object(key.as_str()).await {
            Ok(()) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    // == Has ==
    /// Checks whether an object exists for `key`.
    ///
    /// Expiry metadata is not consulted, so a logically expired entry that is
    /// still stored reports `true` here while [`get`](Self::get) misses.
    pub async fn has(&self, key: &str) -> Result<bool> {
        let key = CacheKey::parse(key)?;
        Ok(self.store.object_exists(key.as_str()).await?)
    }

    // == Clear ==
    /// Always fails: the bucket may hold objects this cache does not own.
    pub async fn clear(&self) -> Result<bool> {
        Err(CacheError::Unsupported("clear"))
    }

    // == Batch Operations ==
    /// Looks up every key, substituting `default` for misses.
    ///
    /// The first store error aborts the whole batch.
    pub async fn get_multiple<I, K, D>(&self, keys: I, default: D) -> Result<HashMap<String, D>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
        D: From<String> + Clone,
    {
        let mut values = HashMap::new();
        for key in keys {
            let key = key.as_ref();
            let value = self.get(key, default.clone()).await?;
            values.insert(key.to_string(), value);
        }
        Ok(values)
    }

    /// Writes each pair in order, stopping at the first failed write.
    ///
    /// Pairs written before the failure stay written.
    pub async fn set_multiple<I, K, V>(&self, values: I, ttl: Option<Ttl>) -> Result<bool>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (key, value) in values {
            if !self.set(key.as_ref(), value, ttl).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Deletes each key in order, stopping at the first key that was absent.
    pub async fn delete_multiple<I, K>(&self, keys: I) -> Result<bool>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        for key in keys {
            if !self.delete(key.as_ref()).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
