use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::time::{self, Duration};
use tracing::info;

#[derive(Debug)]
pub struct StatsCollector {
    total_checks: AtomicU64,
    cache_hits: AtomicU64,
    network_checks: AtomicU64,
    flagged: AtomicU64,
    failures: AtomicU64,
    skipped: AtomicU64,

    log_interval: Duration,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub total_checks: u64,
    pub cache_hits: u64,
    pub network_checks: u64,
    pub flagged: u64,
    pub failures: u64,
    pub skipped: u64,
}

impl StatsCollector {
    pub fn new(log_interval_sec: u64) -> Arc<Self> {
        let stats = Arc::new(Self {
            total_checks: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            network_checks: AtomicU64::new(0),
            flagged: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
            log_interval: Duration::from_secs(log_interval_sec),
        });

        // Spawn background dumper
        let stats_clone = stats.clone();
        tokio::spawn(async move {
            stats_clone.run_logger().await;
        });

        stats
    }

    pub fn inc_checks(&self) {
        self.total_checks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_network_check(&self) {
        self.network_checks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_flagged(&self) {
        self.flagged.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_checks: self.total_checks.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            network_checks: self.network_checks.load(Ordering::Relaxed),
            flagged: self.flagged.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }

    async fn run_logger(&self) {
        let mut interval = time::interval(self.log_interval);
        loop {
            interval.tick().await;
            self.dump_stats();
        }
    }

    fn dump_stats(&self) {
        let snap = self.get_snapshot();
        let hit_pct = if snap.total_checks > 0 {
            (snap.cache_hits as f64 / snap.total_checks as f64) * 100.0
        } else {
            0.0
        };

        info!(
            "STATS DUMP: Checks: {}, CacheHits: {} ({:.1}%), Network: {}, Flagged: {}, Failures: {}, Skipped: {}",
            snap.total_checks, snap.cache_hits, hit_pct, snap.network_checks, snap.flagged,
            snap.failures, snap.skipped
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counters_and_snapshot() {
        let stats = StatsCollector::new(3600);
        stats.inc_checks();
        stats.inc_checks();
        stats.inc_cache_hit();
        stats.inc_network_check();
        stats.inc_flagged();
        stats.inc_failure();

        let snap = stats.get_snapshot();
        assert_eq!(snap.total_checks, 2);
        assert_eq!(snap.cache_hits, 1);
        assert_eq!(snap.network_checks, 1);
        assert_eq!(snap.flagged, 1);
        assert_eq!(snap.failures, 1);
        assert_eq!(snap.skipped, 0);
    }
}
