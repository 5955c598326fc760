//! LRU TTL Cache - interactive console
//!
//! Reads commands from stdin, one per line, and prints the results.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use parking_lot::Mutex;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lru_ttl_cache::console::{execute, Command, DEBUG_HOOK_NAME};
use lru_ttl_cache::diagnostics::DebugHooks;
use lru_ttl_cache::{Config, LruTtlCache, SharedCache};

/// Entry point for the cache console.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache with configured parameters
/// 4. Register the debug hook when running in development
/// 5. Execute stdin commands until EOF or `quit`
fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lru_ttl_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::from_env();
    config.validate().context("invalid cache configuration")?;
    info!(
        "Configuration loaded: capacity={}, default_ttl={}ms, environment={:?}",
        config.capacity, config.default_ttl_ms, config.environment
    );

    let cache: SharedCache<String> = Arc::new(Mutex::new(
        LruTtlCache::from_config(&config).context("failed to build cache")?,
    ));

    let mut hooks = DebugHooks::new();
    hooks.register_cache_debug(DEBUG_HOOK_NAME, &cache, config.environment);

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            break;
        }

        match Command::parse(trimmed) {
            Ok(command) => {
                for output in execute(&cache, &hooks, command) {
                    writeln!(stdout, "{}", output)?;
                }
            }
            Err(err) => {
                warn!("{}", err);
                writeln!(stdout, "ERR {}", err)?;
            }
        }
        stdout.flush()?;
    }

    cache.lock().log_metrics();
    info!("Console closed");
    Ok(())
}
