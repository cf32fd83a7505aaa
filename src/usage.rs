//! Per-client usage counters backed by a single SQLite table.
//!
//! Every authenticated request bumps the caller's count. The table doubles as
//! a cheap billing/monitoring feed, so counts survive restarts unless the
//! server runs with an in-memory store.

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::Connection;
use std::path::PathBuf;

/// One row of the usage table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageRow {
    pub client_id: String,
    pub requests: u64,
    pub last_seen: String,
}

/// SQLite-backed usage counter store.
pub struct UsageStore {
    db: Connection,
}

impl UsageStore {
    /// Open or create a usage store at the given path.
    pub fn open(path: &PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Connection::open(path)
            .with_context(|| format!("failed to open usage store: {}", path.display()))?;
        Self::init(db)
    }

    /// Open a throwaway in-memory store (tests, `--ephemeral` runs).
    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    /// Open the default store at ~/.beacon/usage.db.
    pub fn default_store() -> Result<Self> {
        let path = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".beacon")
            .join("usage.db");
        Self::open(&path)
    }

    fn init(db: Connection) -> Result<Self> {
        db.execute_batch(
            "CREATE TABLE IF NOT EXISTS usage_counts (
                client_id TEXT PRIMARY KEY,
                requests INTEGER NOT NULL DEFAULT 0,
                last_seen TEXT NOT NULL
            );",
        )
        .context("failed to create usage_counts table")?;
        Ok(Self { db })
    }

    /// Record one authenticated request and return the client's new count.
    pub fn record(&mut self, client_id: &str) -> Result<u64> {
        let now = Utc::now().to_rfc3339();
        self.db.execute(
            "INSERT INTO usage_counts (client_id, requests, last_seen)
             VALUES (?1, 1, ?2)
             ON CONFLICT(client_id) DO UPDATE SET
                 requests = requests + 1,
                 last_seen = excluded.last_seen",
            rusqlite::params![client_id, now],
        )?;
        self.count(client_id)
    }

    /// Current request count for a client (0 if never seen).
    pub fn count(&self, client_id: &str) -> Result<u64> {
        let result = self.db.query_row(
            "SELECT requests FROM usage_counts WHERE client_id = ?1",
            rusqlite::params![client_id],
            |row| row.get::<_, i64>(0),
        );
        match result {
            Ok(n) => Ok(n.max(0) as u64),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    /// Total requests served across all clients.
    pub fn total(&self) -> Result<u64> {
        let n: i64 = self.db.query_row(
            "SELECT COALESCE(SUM(requests), 0) FROM usage_counts",
            [],
            |row| row.get(0),
        )?;
        Ok(n.max(0) as u64)
    }

    /// All usage rows, highest count first.
    pub fn rows(&self) -> Result<Vec<UsageRow>> {
        let mut stmt = self.db.prepare(
            "SELECT client_id, requests, last_seen FROM usage_counts ORDER BY requests DESC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(UsageRow {
                    client_id: row.get(0)?,
                    requests: row.get::<_, i64>(1)?.max(0) as u64,
                    last_seen: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_increments() {
        let mut store = UsageStore::in_memory().unwrap();
        assert_eq!(store.count("demo").unwrap(), 0);
        assert_eq!(store.record("demo").unwrap(), 1);
        assert_eq!(store.record("demo").unwrap(), 2);
        assert_eq!(store.count("demo").unwrap(), 2);
    }

    #[test]
    fn test_clients_counted_separately() {
        let mut store = UsageStore::in_memory().unwrap();
        store.record("a").unwrap();
        store.record("a").unwrap();
        store.record("b").unwrap();
        assert_eq!(store.count("a").unwrap(), 2);
        assert_eq!(store.count("b").unwrap(), 1);
        assert_eq!(store.total().unwrap(), 3);

        let rows = store.rows().unwrap();
        assert_eq!(rows[0].client_id, "a");
        assert_eq!(rows[1].client_id, "b");
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usage.db");
        {
            let mut store = UsageStore::open(&path).unwrap();
            store.record("demo").unwrap();
        }
        let store = UsageStore::open(&path).unwrap();
        assert_eq!(store.count("demo").unwrap(), 1);
    }
}
