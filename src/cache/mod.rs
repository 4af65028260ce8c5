pub mod memory;
pub mod sqlite;
pub mod store;

pub use self::memory::MemoryStore;
pub use self::sqlite::SqliteStore;
pub use self::store::CacheStore;

use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, error};

/// Last-known verdict for a domain. At most one record exists per domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainRecord {
    pub domain: String,
    /// Milliseconds since epoch of the last completed classification.
    /// Zero means the domain was never checked.
    pub last_checked_ms: u64,
    pub last_score: f64,
}

/// Pure freshness decision: a record is fresh while its age is strictly
/// below the TTL. A never-checked record (`last_checked_ms == 0`) is
/// always stale.
pub fn is_fresh(record: &DomainRecord, now_ms: u64, ttl: Duration) -> bool {
    if record.last_checked_ms == 0 {
        return false;
    }
    now_ms.saturating_sub(record.last_checked_ms) < ttl.as_millis() as u64
}

/// Current wall-clock time in milliseconds since epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Domain-level verdict cache with an injected storage backend.
///
/// Verdicts are recorded per host, not per URL: all pages on one host are
/// treated as equally risky, which keeps the cache small and matches the
/// signal phishing classification actually keys on.
#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl ResultCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Looks up the record for a domain. Absent is a valid outcome, never
    /// an error; backend failures are logged and reported as absent.
    pub fn lookup(&self, domain: &str) -> Option<DomainRecord> {
        match self.store.get(domain) {
            Ok(record) => record,
            Err(e) => {
                error!("Cache lookup failed for {}: {}", domain, e);
                None
            }
        }
    }

    /// True if the domain has a verdict recorded within the freshness
    /// window ending at `now_ms`.
    pub fn has_fresh_verdict(&self, domain: &str, now_ms: u64) -> Option<DomainRecord> {
        self.lookup(domain)
            .filter(|record| is_fresh(record, now_ms, self.ttl))
    }

    /// Inserts or overwrites the record for a domain. Last-writer-wins is
    /// acceptable for concurrent completions; `last_checked_ms` never
    /// moves backwards for a given domain.
    pub fn update(&self, domain: &str, score: f64, now_ms: u64) -> Result<()> {
        if let Some(existing) = self.lookup(domain) {
            if existing.last_checked_ms > now_ms {
                debug!(
                    "Skipping stale cache write for {} ({} > {})",
                    domain, existing.last_checked_ms, now_ms
                );
                return Ok(());
            }
        }

        self.store.upsert(&DomainRecord {
            domain: domain.to_string(),
            last_checked_ms: now_ms,
            last_score: score,
        })
    }

    /// Number of recorded domains, for diagnostics.
    pub fn len(&self) -> usize {
        self.store.len().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
