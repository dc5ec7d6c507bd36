//! Cache Entry Module
//!
//! Maps cache entries onto bucket objects. The value is the object body and
//! the optional expiry is an `expires_at` metadata field holding absolute
//! Unix seconds.

use chrono::{DateTime, Duration, Utc};

use crate::cache::{CONTENT_TYPE, EXPIRES_AT};
use crate::storage::{ObjectAcl, ObjectMetadata, PutObjectRequest, StoredObject};

// == Time To Live ==
/// Relative lifetime supplied when writing an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// A calendar-free duration added to the current time
    Interval(Duration),
    /// A whole number of seconds
    Seconds(i64),
}

impl Ttl {
    /// Resolves the TTL to an absolute Unix timestamp relative to `now`.
    ///
    /// Returns `None` when the result leaves the representable range.
    pub fn expires_at(&self, now: DateTime<Utc>) -> Option<i64> {
        match *self {
            Ttl::Interval(interval) => now.checked_add_signed(interval).map(|t| t.timestamp()),
            Ttl::Seconds(secs) => now.timestamp().checked_add(secs),
        }
    }
}

impl From<Duration> for Ttl {
    fn from(interval: Duration) -> Self {
        Ttl::Interval(interval)
    }
}

impl From<std::time::Duration> for Ttl {
    fn from(interval: std::time::Duration) -> Self {
        match Duration::from_std(interval) {
            Ok(interval) => Ttl::Interval(interval),
            Err(_) => Ttl::Seconds(i64::try_from(interval.as_secs()).unwrap_or(i64::MAX)),
        }
    }
}

impl From<i64> for Ttl {
    fn from(secs: i64) -> Self {
        Ttl::Seconds(secs)
    }
}

impl From<u64> for Ttl {
    fn from(secs: u64) -> Self {
        Ttl::Seconds(i64::try_from(secs).unwrap_or(i64::MAX))
    }
}

impl From<i32> for Ttl {
    fn from(secs: i32) -> Self {
        Ttl::Seconds(i64::from(secs))
    }
}

// == Cache Entry ==
/// A cached value together with its absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// The stored value
    pub value: String,
    /// Expiration timestamp (Unix seconds), None = no expiration
    pub expires_at: Option<i64>,
}

impl CacheEntry {
    // == Constructor ==
    pub fn new(value: impl Into<String>, expires_at: Option<i64>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// Reads an entry back from a bucket object.
    ///
    /// The body is decoded as UTF-8, replacing invalid sequences. An empty or
    /// `"0"` `expires_at` means no expiry; any other value is read as its
    /// leading integer, so unparseable text expires the entry.
    pub fn from_object(object: StoredObject) -> Self {
        let expires_at = parse_expires_at(&object.metadata);
        let value = match String::from_utf8(object.body) {
            Ok(value) => value,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        };

        Self { value, expires_at }
    }

    /// Builds the put request that persists this entry under `key`.
    pub fn into_put_request(self, key: impl Into<String>) -> PutObjectRequest {
        let mut metadata = ObjectMetadata::new();
        if let Some(expires_at) = self.expires_at {
            metadata.insert(EXPIRES_AT.to_string(), expires_at.to_string());
        }

        PutObjectRequest {
            key: key.into(),
            body: self.value.into_bytes(),
            metadata,
            acl: ObjectAcl::Private,
            content_type: CONTENT_TYPE.to_string(),
        }
    }

    // == Is Expired ==
    /// Checks whether the entry is logically expired at `now`.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// its expiration time.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires) => now.timestamp() >= expires,
            None => false,
        }
    }
}

fn parse_expires_at(metadata: &ObjectMetadata) -> Option<i64> {
    let raw = metadata.get(EXPIRES_AT)?;
    if raw.is_empty() || raw == "0" {
        return None;
    }
    Some(leading_integer(raw))
}

/// Reads the optionally signed run of digits at the start of `raw`.
///
/// Yields 0 when there are no digits and saturates on overflow.
fn leading_integer(raw: &str) -> i64 {
    let raw = raw.trim_start();
    let sign_len = usize::from(raw.starts_with(['+', '-']));
    let digits = raw[sign_len..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return 0;
    }

    raw[..sign_len + digits].parse().unwrap_or(if raw.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    })
}
