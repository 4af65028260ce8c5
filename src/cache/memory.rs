use super::store::CacheStore;
use super::DomainRecord;
use anyhow::Result;
use rustc_hash::FxHashMap;
use std::sync::RwLock;

/// In-memory backend. Used by tests and by ephemeral deployments that do
/// not want verdicts to survive a restart.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<FxHashMap<Box<str>, DomainRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryStore {
    fn get(&self, domain: &str) -> Result<Option<DomainRecord>> {
        let records = self.records.read().unwrap();
        Ok(records.get(domain).cloned())
    }

    fn upsert(&self, record: &DomainRecord) -> Result<()> {
        let mut records = self.records.write().unwrap();
        records.insert(record.domain.as_str().into(), record.clone());
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.records.read().unwrap().len())
    }
}
