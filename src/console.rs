//! Console Module
//!
//! Line-oriented command driver for a shared cache of strings.
//!
//! # Commands
//! - `put <key> <value> [ttl_ms]` - Store a value (default TTL when omitted)
//! - `get <key>` - Read a value, promoting it
//! - `del <key>` - Delete a key
//! - `purge` - Drop every expired entry
//! - `len` - Entry count and capacity
//! - `metrics` - Hit, miss and eviction rates
//! - `clear` - Drop all entries and metrics
//! - `clear-metrics` - Zero the metrics only
//! - `debug` - Debug snapshot, when the hook is exposed
//! - `help` - List the commands
//!
//! `quit` and `exit` are handled by the binary's input loop.

use std::time::Duration;

use tracing::debug;

use crate::diagnostics::DebugHooks;
use crate::error::{CacheError, Result};
use crate::shared::SharedCache;

/// Name under which the cache's debug snapshot is registered.
pub const DEBUG_HOOK_NAME: &str = "cacheDebug";

/// Printed for absent or expired keys.
pub const NIL: &str = "(nil)";

// == Command ==
/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Put {
        key: String,
        value: String,
        ttl: Option<Duration>,
    },
    Get {
        key: String,
    },
    Del {
        key: String,
    },
    Purge,
    Len,
    Metrics,
    Clear,
    ClearMetrics,
    Debug,
    Help,
}

impl Command {
    // == Parse ==
    /// Parses one input line.
    ///
    /// # Arguments
    /// * `line` - Raw console input; the verb is matched case-insensitively
    ///
    /// # Errors
    /// `CacheError::InvalidCommand` for unknown verbs or wrong arguments.
    pub fn parse(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let verb = parts
            .next()
            .ok_or_else(|| CacheError::InvalidCommand("empty line".to_string()))?;
        let args: Vec<&str> = parts.collect();

        let command = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("put", [key, value]) => Command::Put {
                key: key.to_string(),
                value: value.to_string(),
                ttl: None,
            },
            ("put", [key, value, ttl]) => Command::Put {
                key: key.to_string(),
                value: value.to_string(),
                ttl: Some(parse_ttl(ttl)?),
            },
            ("get", [key]) => Command::Get {
                key: key.to_string(),
            },
            ("del", [key]) => Command::Del {
                key: key.to_string(),
            },
            ("purge", []) => Command::Purge,
            ("len", []) => Command::Len,
            ("metrics", []) => Command::Metrics,
            ("clear", []) => Command::Clear,
            ("clear-metrics", []) => Command::ClearMetrics,
            ("debug", []) => Command::Debug,
            ("help", []) => Command::Help,
            ("put" | "get" | "del", _) => {
                return Err(CacheError::InvalidCommand(format!(
                    "wrong number of arguments for '{}'",
                    verb
                )))
            }
            _ => return Err(CacheError::InvalidCommand(line.trim().to_string())),
        };

        Ok(command)
    }
}

fn parse_ttl(raw: &str) -> Result<Duration> {
    raw.parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| CacheError::InvalidCommand(format!("TTL must be milliseconds, got '{}'", raw)))
}

// == Execute ==
/// Runs a command against the cache and returns the lines to print.
///
/// # Arguments
/// * `cache` - Shared cache the command operates on
/// * `hooks` - Debug hooks consulted by the `debug` command
/// * `command` - Parsed command to run
///
/// The cache lock is released before a debug hook runs, since hooks lock it
/// themselves.
pub fn execute(cache: &SharedCache<String>, hooks: &DebugHooks, command: Command) -> Vec<String> {
    debug!(?command, "executing console command");

    match command {
        Command::Put { key, value, ttl } => {
            let mut cache = cache.lock();
            match ttl {
                Some(ttl) => cache.put(key, value, ttl),
                None => cache.insert(key, value),
            };
            vec!["OK".to_string()]
        }
        Command::Get { key } => {
            let mut cache = cache.lock();
            let line = cache
                .get_option(&key)
                .cloned()
                .unwrap_or_else(|| NIL.to_string());
            vec![line]
        }
        Command::Del { key } => {
            let removed = cache.lock().remove(&key);
            vec![removed.map_or_else(|| NIL.to_string(), |_| "OK".to_string())]
        }
        Command::Purge => vec![cache.lock().purge_expired().to_string()],
        Command::Len => {
            let cache = cache.lock();
            vec![format!("{}/{}", cache.len(), cache.capacity())]
        }
        Command::Metrics => {
            let cache = cache.lock();
            cache.log_metrics();
            cache.metrics().report_lines().to_vec()
        }
        Command::Clear => {
            cache.lock().clear();
            vec!["OK".to_string()]
        }
        Command::ClearMetrics => {
            cache.lock().clear_metrics();
            vec!["OK".to_string()]
        }
        Command::Debug => match hooks.invoke(DEBUG_HOOK_NAME) {
            Some(dump) => {
                cache.lock().log_debug();
                dump.lines().map(str::to_string).collect()
            }
            None => vec!["debug hook not available".to_string()],
        },
        Command::Help => HELP.lines().map(str::to_string).collect(),
    }
}

const HELP: &str = "\
put <key> <value> [ttl_ms]
get <key>
del <key>
purge
len
metrics
clear
clear-metrics
debug
help
quit | exit";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::LruTtlCache;
    use crate::diagnostics::Environment;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn shared(capacity: usize) -> SharedCache<String> {
        Arc::new(Mutex::new(LruTtlCache::new(capacity).unwrap()))
    }

    fn run(cache: &SharedCache<String>, hooks: &DebugHooks, line: &str) -> Vec<String> {
        execute(cache, hooks, Command::parse(line).unwrap())
    }

    #[test]
    fn test_parse_put() {
        assert_eq!(
            Command::parse("put a 1").unwrap(),
            Command::Put {
                key: "a".to_string(),
                value: "1".to_string(),
                ttl: None
            }
        );
        assert_eq!(
            Command::parse("PUT a 1 1500").unwrap(),
            Command::Put {
                key: "a".to_string(),
                value: "1".to_string(),
                ttl: Some(Duration::from_millis(1500))
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Command::parse(""), Err(CacheError::InvalidCommand(_))));
        assert!(matches!(Command::parse("get"), Err(CacheError::InvalidCommand(_))));
        assert!(matches!(
            Command::parse("put a 1 soon"),
            Err(CacheError::InvalidCommand(_))
        ));
        assert!(matches!(Command::parse("frob"), Err(CacheError::InvalidCommand(_))));
        assert!(matches!(Command::parse("len extra"), Err(CacheError::InvalidCommand(_))));
    }

    #[test]
    fn test_put_get_del() {
        let cache = shared(4);
        let hooks = DebugHooks::new();

        assert_eq!(run(&cache, &hooks, "put a hello"), vec!["OK"]);
        assert_eq!(run(&cache, &hooks, "get a"), vec!["hello"]);
        assert_eq!(run(&cache, &hooks, "del a"), vec!["OK"]);
        assert_eq!(run(&cache, &hooks, "get a"), vec![NIL]);
        assert_eq!(run(&cache, &hooks, "del a"), vec![NIL]);
    }

    #[test]
    fn test_len_and_eviction() {
        let cache = shared(2);
        let hooks = DebugHooks::new();

        run(&cache, &hooks, "put a 1");
        run(&cache, &hooks, "put b 2");
        run(&cache, &hooks, "put c 3");

        assert_eq!(run(&cache, &hooks, "len"), vec!["2/2"]);
        assert_eq!(run(&cache, &hooks, "get a"), vec![NIL]);
    }

    #[test]
    fn test_metrics_lines() {
        let cache = shared(4);
        let hooks = DebugHooks::new();

        run(&cache, &hooks, "put a 1");
        run(&cache, &hooks, "get a");
        run(&cache, &hooks, "get b");

        assert_eq!(
            run(&cache, &hooks, "metrics"),
            vec!["Hit rate: 50.00%", "Miss rate: 50.00%", "Eviction rate: 0.00%"]
        );

        run(&cache, &hooks, "clear-metrics");
        assert_eq!(run(&cache, &hooks, "metrics")[0], "Hit rate: 0.00%");
        assert_eq!(run(&cache, &hooks, "len"), vec!["1/4"]);
    }

    #[test]
    fn test_help_lists_every_verb() {
        let cache = shared(1);
        let hooks = DebugHooks::new();

        let help = run(&cache, &hooks, "help");
        for verb in ["put", "get", "del", "purge", "len", "metrics", "clear", "debug", "help", "quit"] {
            assert!(help.iter().any(|line| line.starts_with(verb)), "missing {}", verb);
        }
    }

    #[test]
    fn test_clear() {
        let cache = shared(4);
        let hooks = DebugHooks::new();

        run(&cache, &hooks, "put a 1");
        assert_eq!(run(&cache, &hooks, "clear"), vec!["OK"]);
        assert_eq!(run(&cache, &hooks, "len"), vec!["0/4"]);
    }

    #[test]
    fn test_debug_requires_hook() {
        let cache = shared(4);
        let mut hooks = DebugHooks::new();
        run(&cache, &hooks, "put a 1");

        assert_eq!(run(&cache, &hooks, "debug"), vec!["debug hook not available"]);

        hooks.register_cache_debug(DEBUG_HOOK_NAME, &cache, Environment::Development);
        let dump = run(&cache, &hooks, "debug").join("\n");
        let json: serde_json::Value = serde_json::from_str(&dump).unwrap();
        assert_eq!(json["len"], 1);
    }
}
