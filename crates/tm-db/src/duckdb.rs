//! DuckDB driver.
//!
//! DuckDB runs DDL inside transactions, so each migration (script plus ledger
//! update) is all-or-nothing at the store level. Scripts must not issue their
//! own `BEGIN`/`COMMIT`.

use crate::error::{DbError, DbResult};
use crate::ledger::{self, LedgerSession};
use crate::traits::{Driver, MigrationPipe};
use async_trait::async_trait;
use duckdb::Connection;
use std::path::Path;
use std::sync::Mutex;
use tm_core::{ConnectionUrl, MigrationFile, Version};

const MEMORY_PATH: &str = ":memory:";

/// DuckDB driver (`duckdb://<path>` or `duckdb://:memory:`)
#[derive(Default)]
pub struct DuckDbDriver {
    conn: Mutex<Option<Connection>>,
}

impl DuckDbDriver {
    pub const SCHEME: &'static str = "duckdb";

    /// Create an unconnected driver
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a connection from a path string (handles :memory: special case)
    fn open(path: &str) -> DbResult<Connection> {
        if path.is_empty() {
            return Err(DbError::ConnectionError(
                "duckdb url needs a path or :memory:".to_string(),
            ));
        }
        let conn = if path == MEMORY_PATH {
            Connection::open_in_memory()
        } else {
            Connection::open(Path::new(path))
        };
        conn.map_err(|e| DbError::ConnectionError(format!("{}: {}", e, path)))
    }

    /// Run `body` against the open connection
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
        self.execute(sql, duckdb::params![version])
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
        let sql = format!(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = 'main' AND table_name = '{}'",
            ledger::LEDGER_TABLE
        );
        let count: i64 = self
            .query_row(&sql, [], |row| row.get(0))
            .map_err(|e| e.to_string())?;
        Ok(count > 0)
    }

    fn ledger_column_type(&self) -> Result<Option<String>, String> {
        let sql = format!(
            "SELECT data_type FROM information_schema.columns WHERE table_schema = 'main' AND table_name = '{}' AND column_name = 'version'",
            ledger::LEDGER_TABLE
        );
        let mut stmt = self.prepare(&sql).map_err(|e| e.to_string())?;
        let mut rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| e.to_string())?;
        let declared = rows.next().transpose().map_err(|e| e.to_string())?;
        Ok(declared)
    }
}

#[async_trait]
impl Driver for DuckDbDriver {
    async fn initialize(&self, url: &ConnectionUrl) -> DbResult<()> {
        let mut guard = self.conn.lock()?;
        if guard.is_some() {
            return Err(DbError::ConnectionError(
                "duckdb driver is already initialized".to_string(),
            ));
        }
        let conn = Self::open(url.params())?;
        let layout = ledger::ensure_ledger(&conn)?;
        log::debug!("[duckdb] connected to {} (ledger: {:?})", url.params(), layout);
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
#[path = "duckdb_test.rs"]
mod tests;
