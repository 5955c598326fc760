//! Diagnostics Module
//!
//! Opt-in registry of named debug hooks. The cache exposes its snapshot as a
//! plain method; the application decides here whether to surface it.

use std::collections::BTreeMap;
use std::env;
use std::fmt::Debug;
use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::Clock;
use crate::shared::SharedCache;

// == Environment ==
/// Where the process is running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    /// Reads `APP_ENV`; `development`, `dev` and `local` mean Development.
    pub fn detect() -> Self {
        env::var("APP_ENV")
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }

    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Environment::Development,
            _ => Environment::Production,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

type Hook = Box<dyn Fn() -> String + Send + Sync>;

// == Debug Hooks ==
/// Named diagnostic callbacks.
#[derive(Default)]
pub struct DebugHooks {
    hooks: BTreeMap<String, Hook>,
}

impl DebugHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `hook` under `name`, replacing any previous hook of that name.
    pub fn register<F>(&mut self, name: impl Into<String>, hook: F)
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        let name = name.into();
        debug!(name = %name, "debug hook registered");
        self.hooks.insert(name, Box::new(hook));
    }

    /// Registers the cache's debug snapshot under `name`, in Development only.
    ///
    /// # Arguments
    /// * `name` - Hook name the console looks up
    /// * `cache` - Shared cache whose snapshot the hook renders
    /// * `environment` - Running environment; anything but Development skips registration
    ///
    /// Returns whether the hook was registered.
    pub fn register_cache_debug<T, C>(
        &mut self,
        name: &str,
        cache: &SharedCache<T, C>,
        environment: Environment,
    ) -> bool
    where
        T: Debug + Send + 'static,
        C: Clock + Send + 'static,
    {
        if !environment.is_development() {
            info!(name, "debug hook not exposed outside development");
            return false;
        }

        let cache = Arc::clone(cache);
        self.register(name, move || cache.lock().debug_snapshot().to_string());
        true
    }

    /// Runs the hook registered under `name`.
    pub fn invoke(&self, name: &str) -> Option<String> {
        self.hooks.get(name).map(|hook| hook())
    }

    /// Registered hook names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.hooks.keys().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}
