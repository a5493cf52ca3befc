//! SQLite driver.
//!
//! SQLite DDL is transactional, so each migration is all-or-nothing at the
//! store level, same as DuckDB. Every integer column is 64-bit here, so only
//! a `version` column without integer affinity counts as a legacy ledger.

use crate::error::{DbError, DbResult};
use crate::ledger::{self, LedgerLayout, LedgerSession};
use crate::traits::{Driver, MigrationPipe};
use async_trait::async_trait;
use rusqlite::Connection;
use std::sync::Mutex;
use tm_core::{ConnectionUrl, MigrationFile, Version};

/// SQLite driver (`sqlite://<path>` or `sqlite://:memory:`)
#[derive(Default)]
pub struct SqliteDriver {
    conn: Mutex<Option<Connection>>,
}

impl SqliteDriver {
    pub const SCHEME: &'static str = "sqlite";

    pub fn new() -> Self {
        Self::default()
    }

    fn open(path: &str) -> DbResult<Connection> {
        let conn = match path {
            "" => {
                return Err(DbError::ConnectionError(
                    "sqlite url needs a path or :memory:".to_string(),
                ))
            }
            ":memory:" => Connection::open_in_memory(),
            path => Connection::open(path),
        };
        conn.map_err(|e| DbError::ConnectionError(format!("{}: {}", e, path)))
    }

    fn with_conn<T>(&self, body: impl FnOnce(&Connection) -> DbResult<T>) -> DbResult<T> {
        let guard = self.conn.lock()?;
        let conn = guard.as_ref().ok_or(DbError::NotConnected {
            backend: Self::SCHEME,
        })?;
        body(conn)
    }
}

impl LedgerSession for Connection {
    fn run_batch(&self, sql: &str) -> Result<(), String> {
        self.execute_batch(sql).map_err(|e| e.to_string())
    }

    fn run_with_version(&self, sql: &str, version: i64) -> Result<usize, String> {
        self.execute(sql, rusqlite::params![version])
            .map_err(|e| e.to_string())
    }

    fn fetch_versions(&self, sql: &str) -> Result<Vec<i64>, String> {
        let mut stmt = self.prepare(sql).map_err(|e| e.to_string())?;
        let rows = stmt
            .query_map([], |row| row.get::<_, i64>(0))
            .map_err(|e| e.to_string())?;
        let versions = rows
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| e.to_string())?;
        Ok(versions)
    }

    fn fetch_max_version(&self, sql: &str) -> Result<Option<i64>, String> {
        self.query_row(sql, [], |row| row.get::<_, Option<i64>>(0))
            .map_err(|e| e.to_string())
    }

    fn ledger_table_exists(&self) -> Result<bool, String> {
        let count: i64 = self
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                rusqlite::params![ledger::LEDGER_TABLE],
                |row| row.get(0),
            )
            .map_err(|e| e.to_string())?;
        Ok(count > 0)
    }

    fn ledger_column_type(&self) -> Result<Option<String>, String> {
        let sql = format!(
            "SELECT type FROM pragma_table_info('{}') WHERE name = 'version'",
            ledger::LEDGER_TABLE
        );
        let mut stmt = self.prepare(&sql).map_err(|e| e.to_string())?;
        let mut rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| e.to_string())?;
        let declared = rows.next().transpose().map_err(|e| e.to_string())?;
        Ok(declared)
    }

    fn classify_version_column(&self, declared: &str) -> LedgerLayout {
        LedgerLayout::from_affinity(declared)
    }
}

#[async_trait]
impl Driver for SqliteDriver {
    async fn initialize(&self, url: &ConnectionUrl) -> DbResult<()> {
        let mut guard = self.conn.lock()?;
        if guard.is_some() {
            return Err(DbError::ConnectionError(
                "sqlite driver is already initialized".to_string(),
            ));
        }
        let conn = Self::open(url.params())?;
        let layout = ledger::ensure_ledger(&conn)?;
        log::debug!("[sqlite] connected to {} (ledger: {:?})", url.params(), layout);
        *guard = Some(conn);
        Ok(())
    }

    async fn close(&self) -> DbResult<()> {
        let conn = self.conn.lock()?.take().ok_or(DbError::NotConnected {
            backend: Self::SCHEME,
        })?;
        conn.close()
            .map_err(|(_, e)| DbError::ConnectionError(e.to_string()))
    }

    async fn migrate(&self, file: MigrationFile, pipe: MigrationPipe) {
        pipe.notice(format!("applying {}", file.file_name()));
        let result = self.with_conn(|conn| ledger::apply_migration(conn, &file));
        ledger::report_outcome(self.db_type(), &file, result, pipe);
    }

    async fn version(&self) -> DbResult<Option<Version>> {
        self.with_conn(|conn| ledger::read_latest(conn))
    }

    async fn versions(&self) -> DbResult<Vec<Version>> {
        self.with_conn(|conn| ledger::read_versions(conn))
    }

    fn db_type(&self) -> &'static str {
        Self::SCHEME
    }
}

#[cfg(test)]
#[path = "sqlite_test.rs"]
mod tests;
