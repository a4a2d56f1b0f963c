//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the RecordStore trait.

use crate::extract::EnrichedRecord;
use crate::storage::schema::{initialize_schema, INSERT_RECORD_SQL};
use crate::storage::traits::{ensure_ids, RecordStore, StorageResult};
use crate::storage::RunStatus;
use chrono::Utc;
use rusqlite::{params, params_from_iter, Connection, OpenFlags};
use std::collections::HashSet;
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
    run_id: Option<i64>,
}

impl SqliteStorage {
    /// Opens (or creates) the database at `path`
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn, run_id: None })
    }

    /// Opens an existing database read-only
    ///
    /// Nothing is created or migrated, so a missing file is an error.
    pub fn open_read_only(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn, run_id: None })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn, run_id: None })
    }

    /// Returns the status recorded for a run
    pub fn run_status(&self, run_id: i64) -> StorageResult<Option<RunStatus>> {
        let status: String = self.conn.query_row(
            "SELECT status FROM runs WHERE id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(RunStatus::from_db_string(&status))
    }

    /// Returns the id of the run started by this handle, if any
    pub fn current_run(&self) -> Option<i64> {
        self.run_id
    }
}

impl RecordStore for SqliteStorage {
    fn load_ids(&self) -> StorageResult<HashSet<String>> {
        let mut stmt = self.conn.prepare("SELECT id FROM records")?;
        let mut ids = HashSet::new();
        for id in stmt.query_map([], |row| row.get::<_, String>(0))? {
            let id = id?;
            let id = id.trim();
            if !id.is_empty() {
                ids.insert(id.to_string());
            }
        }
        Ok(ids)
    }

    fn count_records(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn append(&mut self, records: &[EnrichedRecord]) -> StorageResult<()> {
        ensure_ids(records)?;

        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(INSERT_RECORD_SQL)?;
            for record in records {
                let row = record.to_row();
                let inserted =
                    stmt.execute(params_from_iter(row.iter().chain(std::iter::once(&now))))?;
                if inserted == 0 {
                    tracing::debug!("Record {} already stored, ignoring", record.id());
                }
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn begin_run(&mut self, config_hash: &str) -> StorageResult<()> {
        // Any run still marked running was cut short by a crash or kill
        let interrupted = self.conn.execute(
            "UPDATE runs SET status = ?1 WHERE status = ?2",
            params![
                RunStatus::Interrupted.to_db_string(),
                RunStatus::Running.to_db_string()
            ],
        )?;
        if interrupted > 0 {
            tracing::info!("Marked {} earlier run(s) as interrupted", interrupted);
        }

        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        self.run_id = Some(self.conn.last_insert_rowid());
        Ok(())
    }

    fn finish_run(&mut self, records_written: u64) -> StorageResult<()> {
        let Some(run_id) = self.run_id else {
            return Ok(());
        };

        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, records_written = ?3 WHERE id = ?4",
            params![
                RunStatus::Completed.to_db_string(),
                now,
                records_written as i64,
                run_id
            ],
        )?;
        Ok(())
    }
}
