//! Cache Entry Module
//!
//! Defines the node stored in the recency list, carrying the value, its
//! deadline and the arena links to its neighbours.

// == Cache Entry ==
/// A single cached value together with its expiry metadata and list links.
#[derive(Debug, Clone)]
pub struct Entry<T> {
    /// Key under which the entry is indexed
    pub key: String,
    /// The stored value
    pub value: T,
    /// Insertion timestamp (milliseconds)
    pub created_at: u64,
    /// Deadline (milliseconds); the entry is expired once the clock passes it
    pub expires_at: u64,
    /// Slot of the more recently used neighbour, None at the head
    pub(crate) prev: Option<usize>,
    /// Slot of the less recently used neighbour, None at the tail
    pub(crate) next: Option<usize>,
}

impl<T> Entry<T> {
    // == Constructor ==
    /// Creates an unlinked entry that expires `ttl_ms` after `now`.
    ///
    /// # Arguments
    /// * `key` - Key under which the entry is indexed
    /// * `value` - The value to store
    /// * `now` - Insertion time in milliseconds
    /// * `ttl_ms` - Time to live; the deadline saturates at `u64::MAX`
    pub fn new(key: String, value: T, now: u64, ttl_ms: u64) -> Self {
        Self {
            key,
            value,
            created_at: now,
            expires_at: now.saturating_add(ttl_ms),
            prev: None,
            next: None,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry is live up to and including its deadline and expired strictly
    /// after it, so a zero TTL still serves a read made in the same millisecond.
    pub fn is_expired_at(&self, now: u64) -> bool {
        now > self.expires_at
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, 0 once expired.
    pub fn ttl_remaining_ms(&self, now: u64) -> u64 {
        self.expires_at.saturating_sub(now)
    }

    /// True when the entry is not linked to any neighbour.
    #[cfg(test)]
    pub(crate) fn is_detached(&self) -> bool {
        self.prev.is_none() && self.next.is_none()
    }
}
