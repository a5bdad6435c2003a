//! Response cache for list payloads.
//!
//! Entries map a key derived from the view identity and its normalized query
//! parameters to the serialized JSON payload. Every entry lives for a fixed TTL
//! and is never updated in place.
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! ttl_seconds = 60
//! ```

mod config;
mod keys;
mod store;

pub use config::CacheConfig;
pub use keys::list_cache_key;
pub use store::{CacheError, CacheStore, MemoryCacheStore};
