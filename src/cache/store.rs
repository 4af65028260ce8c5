use super::DomainRecord;
use anyhow::Result;

/// Storage backend for the domain verdict cache.
///
/// Implementations must tolerate concurrent callers; last-writer-wins on
/// `upsert` is acceptable.
pub trait CacheStore: Send + Sync {
    fn get(&self, domain: &str) -> Result<Option<DomainRecord>>;
    fn upsert(&self, record: &DomainRecord) -> Result<()>;
    fn len(&self) -> Result<usize>;
}
