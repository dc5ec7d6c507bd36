//! Bucket Cache - a string-keyed cache stored in an object-storage bucket
//!
//! Entries are bucket objects; TTLs become an `expires_at` metadata field
//! that is checked lazily on read.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;

pub use api::AppState;
pub use cache::{CacheKey, ObjectStoreCache, SetOutcome, Ttl};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use error::{CacheError, StoreError};
pub use storage::{FsObjectStore, MemoryObjectStore, ObjectStore};
