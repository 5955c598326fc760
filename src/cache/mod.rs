//! Cache Module
//!
//! Provides an in-process cache with LRU eviction and lazy TTL expiration.

mod clock;
mod entry;
mod lookup;
mod recency;
mod snapshot;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::Entry;
pub use lookup::Lookup;
pub use recency::RecencyList;
pub use snapshot::{DebugSnapshot, SnapshotEntry};
pub use stats::CacheMetrics;
pub use store::LruTtlCache;
