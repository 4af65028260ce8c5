use super::store::CacheStore;
use super::DomainRecord;
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Mutex;
use tracing::info;

/// Persistent backend. One row per domain; rows are never evicted, only
/// overwritten by newer verdicts.
pub struct SqliteStore {
    db_path: String,
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new(db_path: String) -> Result<Self> {
        let conn = Connection::open(&db_path)
            .with_context(|| format!("Failed to open cache database at {}", db_path))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        Ok(Self {
            db_path,
            conn: Mutex::new(conn),
        })
    }

    pub fn initialize(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS domain_checks (
                domain TEXT PRIMARY KEY,
                last_checked INTEGER NOT NULL,
                last_suspicion_score REAL NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_checks_last_checked ON domain_checks(last_checked)",
            [],
        )?;

        info!("Cache database initialized at {}", self.db_path);
        Ok(())
    }
}

impl CacheStore for SqliteStore {
    fn get(&self, domain: &str) -> Result<Option<DomainRecord>> {
        let conn = self.conn.lock().unwrap();
        let record = conn
            .prepare_cached(
                "SELECT domain, last_checked, last_suspicion_score
                 FROM domain_checks WHERE domain = ?1",
            )?
            .query_row(params![domain], |row| {
                Ok(DomainRecord {
                    domain: row.get(0)?,
                    last_checked_ms: row.get::<_, i64>(1)? as u64,
                    last_score: row.get(2)?,
                })
            })
            .optional()
            .context("Cache read failed")?;
        Ok(record)
    }

    fn upsert(&self, record: &DomainRecord) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.prepare_cached(
            "INSERT INTO domain_checks (domain, last_checked, last_suspicion_score)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(domain) DO UPDATE SET
                 last_checked = excluded.last_checked,
                 last_suspicion_score = excluded.last_suspicion_score",
        )?
        .execute(params![
            record.domain,
            record.last_checked_ms as i64,
            record.last_score
        ])
        .context("Cache write failed")?;
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn
            .prepare_cached("SELECT COUNT(*) FROM domain_checks")?
            .query_row([], |row| row.get(0))?;
        Ok(count as usize)
    }
}
