use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CheckLogEntry {
    pub domain: String,
    pub url: String,
    pub action: CheckAction,
    pub score: Option<f64>,
    pub latency_ms: u64,
    pub attempts: Option<u32>,
    pub error: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum CheckAction {
    /// Verdict reused from the cache, no network call.
    CachedVerdict,
    /// Fresh classification fetched from the remote service.
    Classified,
    /// Event did not qualify for a check (gate off, bad scheme, no host).
    Skipped,
    /// Classification failed and no verdict was produced.
    Failed,
}

pub trait CheckLogSink: Send + Sync {
    fn log(&self, entry: &CheckLogEntry);
}
