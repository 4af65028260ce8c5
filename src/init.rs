//! Initialization helpers for the application startup.

use crate::cache::{CacheStore, MemoryStore, SqliteStore};
use crate::config::Config;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Sets up the tracing subscriber with the configured filters.
pub fn setup_logging(config: &Config) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let mut filter = config.logging.level.clone();

        // Suppress hyper/reqwest logs unless explicitly enabled/overridden
        if !filter.contains("hyper") {
            filter.push_str(",hyper=off");
        }
        if !filter.contains("reqwest") {
            filter.push_str(",reqwest=warn");
        }

        tracing_subscriber::EnvFilter::new(filter)
    });

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

/// Builds the cache storage backend selected by the config: persistent
/// SQLite for production, plain memory for ephemeral runs.
pub fn init_cache_store(config: &Config) -> Result<Arc<dyn CacheStore>> {
    match config.cache.backend.as_str() {
        "memory" => {
            info!("Using in-memory cache store (verdicts do not survive restarts).");
            Ok(Arc::new(MemoryStore::new()))
        }
        "sqlite" => {
            let store = SqliteStore::new(config.cache.sqlite_path.clone())?;
            store.initialize()?;
            Ok(Arc::new(store))
        }
        other => {
            info!("Unknown cache backend '{}', defaulting to sqlite", other);
            let store = SqliteStore::new(config.cache.sqlite_path.clone())?;
            store.initialize()?;
            Ok(Arc::new(store))
        }
    }
}
