//! Cache Module
//!
//! A string-keyed cache with lazy TTL expiry on top of an object store
//! bucket.

mod entry;
mod key;
mod store;


// Re-export public types
pub use entry::{CacheEntry, Ttl};
pub use key::CacheKey;
pub use store::{ObjectStoreCache, SetOutcome};

// == Public Constants ==
/// Maximum allowed key length in characters
pub const MAX_KEY_LENGTH: usize = 64;

/// Object metadata field holding the absolute expiry (Unix seconds)
pub const EXPIRES_AT: &str = "expires_at";

/// Content type written on every cache object, whatever the payload
pub const CONTENT_TYPE: &str = "application/json";
