//! LRU TTL Cache - An in-process cache with LRU eviction and lazy TTL expiration
//!
//! Provides O(1) insert, lookup and eviction over a hash index paired with a
//! slot-arena recency list, plus hit/miss/eviction accounting.

pub mod cache;
pub mod config;
pub mod console;
pub mod diagnostics;
pub mod error;
pub mod shared;

pub use cache::{CacheMetrics, DebugSnapshot, Lookup, LruTtlCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use shared::{reset_shared_cache, shared_cache, CacheRegistry, SharedCache};
