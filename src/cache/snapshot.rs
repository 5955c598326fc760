//! Debug Snapshot Module
//!
//! Point-in-time diagnostic view of a cache: the recency list, the raw index
//! and the metrics. Building one never mutates the cache.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::cache::CacheMetrics;

// == Snapshot Entry ==
/// One node of the recency list as seen by the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotEntry {
    /// Arena slot holding the node
    pub slot: usize,
    pub key: String,
    /// `Debug` rendering of the stored value
    pub value: String,
    pub expires_at: u64,
    pub ttl_remaining_ms: u64,
    /// Expired but not yet removed by a read
    pub expired: bool,
}

// == Debug Snapshot ==
/// Diagnostic dump of a cache.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugSnapshot {
    pub capacity: usize,
    pub len: usize,
    /// Clock reading used to judge expiry
    pub now_ms: u64,
    /// Recency list from head to tail, at most `capacity` nodes
    pub entries: Vec<SnapshotEntry>,
    /// Key to arena slot
    pub index: BTreeMap<String, usize>,
    pub metrics: CacheMetrics,
}

impl DebugSnapshot {
    /// Keys in recency order, most recent first.
    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.key.as_str()).collect()
    }
}

impl fmt::Display for DebugSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string_pretty(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_json() {
        let mut index = BTreeMap::new();
        index.insert("a".to_string(), 0);

        let snapshot = DebugSnapshot {
            capacity: 2,
            len: 1,
            now_ms: 5,
            entries: vec![SnapshotEntry {
                slot: 0,
                key: "a".to_string(),
                value: "1".to_string(),
                expires_at: 10,
                ttl_remaining_ms: 5,
                expired: false,
            }],
            index,
            metrics: CacheMetrics::new(),
        };

        let parsed: serde_json::Value = serde_json::from_str(&snapshot.to_string()).unwrap();
        assert_eq!(parsed["capacity"], 2);
        assert_eq!(parsed["entries"][0]["key"], "a");
        assert_eq!(parsed["index"]["a"], 0);
        assert_eq!(parsed["metrics"]["hits"], 0);
        assert_eq!(snapshot.keys(), vec!["a"]);
    }
}
