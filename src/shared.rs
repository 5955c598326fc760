//! Shared Cache Module
//!
//! Lazily constructed, process-scoped cache instances.
//!
//! A `CacheRegistry` hands out one shared cache, built on the first request.
//! The capacity passed to later requests is ignored until the registry is
//! reset. Code that needs isolation should own a `LruTtlCache` directly.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::cache::{Clock, LruTtlCache, SystemClock};
use crate::error::Result;

/// Handle to a cache shared between owners.
pub type SharedCache<T, C = SystemClock> = Arc<Mutex<LruTtlCache<T, C>>>;

// == Cache Registry ==
/// Holds at most one shared cache and builds it on demand.
pub struct CacheRegistry<T, C = SystemClock> {
    /// Built cache and the capacity it was built with
    slot: Mutex<Option<(usize, SharedCache<T, C>)>>,
    make_clock: fn() -> C,
}

impl<T> CacheRegistry<T, SystemClock> {
    /// Creates an empty registry timed by the wall clock.
    pub fn new() -> Self {
        Self::with_clock(|| SystemClock)
    }
}

impl<T> Default for CacheRegistry<T, SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: Clock> CacheRegistry<T, C> {
    /// Creates an empty registry whose cache will use a clock from `make_clock`.
    pub fn with_clock(make_clock: fn() -> C) -> Self {
        Self {
            slot: Mutex::new(None),
            make_clock,
        }
    }

    // == Get Or Init ==
    /// Returns the shared cache, building it with `capacity` on first use.
    ///
    /// # Arguments
    /// * `capacity` - Used only when the cache is built; ignored afterwards
    ///
    /// # Errors
    /// `CacheError::InvalidCapacity` when the cache has to be built and
    /// `capacity` is 0. Nothing is stored in that case.
    pub fn get_or_init(&self, capacity: usize) -> Result<SharedCache<T, C>> {
        let mut slot = self.slot.lock();

        if let Some((current, existing)) = slot.as_ref() {
            if *current != capacity {
                debug!(
                    requested = capacity,
                    current = *current,
                    "shared cache already built, ignoring requested capacity"
                );
            }
            return Ok(Arc::clone(existing));
        }

        let cache = LruTtlCache::with_clock(capacity, (self.make_clock)())?;
        let shared = Arc::new(Mutex::new(cache));
        *slot = Some((capacity, Arc::clone(&shared)));
        info!(capacity, "shared cache initialized");
        Ok(shared)
    }

    /// Returns the shared cache if it has been built.
    pub fn get(&self) -> Option<SharedCache<T, C>> {
        self.slot.lock().as_ref().map(|(_, shared)| Arc::clone(shared))
    }

    pub fn is_initialized(&self) -> bool {
        self.slot.lock().is_some()
    }

    // == Reset ==
    /// Forgets the shared cache so the next request builds a fresh one.
    ///
    /// Handles already given out keep working on the old instance.
    pub fn reset(&self) {
        if self.slot.lock().take().is_some() {
            debug!("shared cache reset");
        }
    }
}

// == Default Instance ==
static DEFAULT_REGISTRY: Lazy<CacheRegistry<String>> = Lazy::new(CacheRegistry::new);

/// Returns the process-wide default cache of strings, building it on first use.
pub fn shared_cache(capacity: usize) -> Result<SharedCache<String>> {
    DEFAULT_REGISTRY.get_or_init(capacity)
}

/// Drops the process-wide default cache.
pub fn reset_shared_cache() {
    DEFAULT_REGISTRY.reset();
}
