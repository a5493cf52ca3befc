//! Version ledger shared by every SQL backend.
//!
//! The ledger is the `schema_migrations` table inside the target store. Each
//! backend exposes its connection through [`LedgerSession`]; the algorithms
//! here (layout probe, legacy upgrade, transactional apply, reads) are written
//! once against that trait.
//!
//! Legacy layout: the same table whose `version` column cannot hold a 64-bit
//! integer (historically a 32-bit `INT` holding the latest version). What
//! counts as 64-bit is backend specific, see
//! [`LedgerSession::classify_version_column`]. It is upgraded on
//! `initialize`, keeping every distinct stored value.

use crate::error::{DbError, DbResult};
use crate::traits::MigrationPipe;
use tm_core::{Direction, MigrationFile, Version};

/// Ledger table name
pub const LEDGER_TABLE: &str = "schema_migrations";

pub const CREATE_LEDGER_SQL: &str =
    "CREATE TABLE IF NOT EXISTS schema_migrations (version BIGINT NOT NULL PRIMARY KEY)";

const DROP_LEDGER_SQL: &str = "DROP TABLE schema_migrations";

const SELECT_VERSIONS_SQL: &str = "SELECT version FROM schema_migrations ORDER BY version ASC";

const SELECT_LATEST_SQL: &str = "SELECT MAX(version) FROM schema_migrations";

const SELECT_LEGACY_VERSIONS_SQL: &str =
    "SELECT DISTINCT CAST(version AS BIGINT) FROM schema_migrations WHERE version IS NOT NULL";

const INSERT_VERSION_SQL: &str = "INSERT OR IGNORE INTO schema_migrations (version) VALUES (?)";

const DELETE_VERSION_SQL: &str = "DELETE FROM schema_migrations WHERE version = ?";

/// Column types treated as the current 64-bit layout
const CURRENT_COLUMN_TYPES: &[&str] = &["BIGINT", "INT8", "INT64", "LONG", "UBIGINT", "HUGEINT"];

/// Minimal connection surface the ledger algorithms need.
///
/// Errors are returned as driver messages; the ledger maps them onto the
/// appropriate [`DbError`] variant for the step that failed.
pub trait LedgerSession {
    /// Execute one or more statements
    fn run_batch(&self, sql: &str) -> Result<(), String>;

    /// Execute a statement with a single version parameter
    fn run_with_version(&self, sql: &str, version: i64) -> Result<usize, String>;

    /// Single-column version query
    fn fetch_versions(&self, sql: &str) -> Result<Vec<i64>, String>;

    /// Single nullable integer query (e.g. `MAX(version)`)
    fn fetch_max_version(&self, sql: &str) -> Result<Option<i64>, String>;

    fn ledger_table_exists(&self) -> Result<bool, String>;

    /// Declared type of the ledger's `version` column, `None` if the column
    /// is missing
    fn ledger_column_type(&self) -> Result<Option<String>, String>;

    /// Layout implied by the declared type of the `version` column
    fn classify_version_column(&self, declared: &str) -> LedgerLayout {
        LedgerLayout::from_column_type(declared)
    }
}

/// Shape of the ledger found in a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerLayout {
    /// No ledger table yet
    Absent,
    /// Scalar-era table that needs upgrading
    Legacy,
    /// Multi-entry 64-bit ledger
    Current,
}

impl LedgerLayout {
    /// Classify a declared type by name, for stores with sized integer types
    pub fn from_column_type(declared: &str) -> Self {
        let normalized = declared.trim().to_ascii_uppercase();
        let base = normalized
            .split(|c: char| c == '(' || c.is_whitespace())
            .next()
            .unwrap_or_default();
        if CURRENT_COLUMN_TYPES.contains(&base) {
            LedgerLayout::Current
        } else {
            LedgerLayout::Legacy
        }
    }

    /// Classify by SQLite type affinity: every `INT` type stores 64 bits
    pub fn from_affinity(declared: &str) -> Self {
        if declared.to_ascii_uppercase().contains("INT") {
            LedgerLayout::Current
        } else {
            LedgerLayout::Legacy
        }
    }
}

/// Convert a version to its stored representation
pub fn to_stored(version: Version) -> DbResult<i64> {
    i64::try_from(version)
        .map_err(|_| DbError::InvalidVersion(format!("{} exceeds the ledger range", version)))
}

/// Convert a stored value back to a version
pub fn from_stored(value: i64) -> DbResult<Version> {
    Version::try_from(value)
        .map_err(|_| DbError::InvalidVersion(format!("negative version {} in ledger", value)))
}

/// Statement that records `direction` for one version
pub fn mutation_sql(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => INSERT_VERSION_SQL,
        Direction::Down => DELETE_VERSION_SQL,
    }
}

/// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back on
/// error. `BEGIN`/`COMMIT` failures are mapped with `tx_error`.
pub fn transaction<S, T, F>(session: &S, tx_error: fn(String) -> DbError, body: F) -> DbResult<T>
where
    S: LedgerSession + ?Sized,
    F: FnOnce(&S) -> DbResult<T>,
{
    session
        .run_batch("BEGIN TRANSACTION")
        .map_err(|e| tx_error(format!("BEGIN failed: {e}")))?;

    let result = body(session);

    match &result {
        Ok(_) => {
            if let Err(commit_err) = session.run_batch("COMMIT") {
                if let Err(rollback_err) = session.run_batch("ROLLBACK") {
                    log::warn!("ROLLBACK after failed COMMIT failed: {rollback_err}");
                }
                return Err(tx_error(format!("COMMIT failed: {commit_err}")));
            }
        }
        Err(_) => {
            if let Err(rollback_err) = session.run_batch("ROLLBACK") {
                log::warn!("ROLLBACK failed: {rollback_err}");
            }
        }
    }
    result
}

/// Detect the ledger layout without changing anything
pub fn probe<S: LedgerSession + ?Sized>(session: &S) -> DbResult<LedgerLayout> {
    if !session
        .ledger_table_exists()
        .map_err(DbError::LedgerConsistencyError)?
    {
        return Ok(LedgerLayout::Absent);
    }
    match session
        .ledger_column_type()
        .map_err(DbError::LedgerConsistencyError)?
    {
        Some(declared) => Ok(session.classify_version_column(&declared)),
        None => Err(DbError::SchemaUpgradeError(format!(
            "table {} exists but has no version column",
            LEDGER_TABLE
        ))),
    }
}

/// Create the ledger if absent and upgrade it if legacy. Idempotent.
pub fn ensure_ledger<S: LedgerSession + ?Sized>(session: &S) -> DbResult<LedgerLayout> {
    let layout = probe(session)?;
    match layout {
        LedgerLayout::Absent => {
            log::debug!("Creating version ledger {}", LEDGER_TABLE);
            session
                .run_batch(CREATE_LEDGER_SQL)
                .map_err(DbError::LedgerConsistencyError)?;
        }
        LedgerLayout::Legacy => upgrade_legacy(session)?,
        LedgerLayout::Current => {}
    }
    Ok(layout)
}

fn upgrade_legacy<S: LedgerSession + ?Sized>(session: &S) -> DbResult<()> {
    transaction(session, DbError::SchemaUpgradeError, |s| {
        let preserved = s
            .fetch_versions(SELECT_LEGACY_VERSIONS_SQL)
            .map_err(|e| DbError::SchemaUpgradeError(format!("reading legacy versions: {e}")))?;
        for value in &preserved {
            from_stored(*value).map_err(|e| DbError::SchemaUpgradeError(e.to_string()))?;
        }

        s.run_batch(DROP_LEDGER_SQL)
            .and_then(|_| s.run_batch(CREATE_LEDGER_SQL))
            .map_err(|e| DbError::SchemaUpgradeError(format!("recreating ledger: {e}")))?;

        for value in &preserved {
            s.run_with_version(INSERT_VERSION_SQL, *value)
                .map_err(|e| DbError::SchemaUpgradeError(format!("preserving version: {e}")))?;
        }
        log::info!(
            "Upgraded legacy version ledger ({} version(s) preserved)",
            preserved.len()
        );
        Ok(())
    })
}

/// Run the script and the ledger mutation as one transaction
pub fn apply_migration<S: LedgerSession + ?Sized>(
    session: &S,
    file: &MigrationFile,
) -> DbResult<()> {
    let version = to_stored(file.version())?;
    let script = std::str::from_utf8(file.content()).map_err(|e| {
        DbError::ScriptExecutionError {
            file: file.file_name().to_string(),
            message: format!("script is not valid UTF-8: {e}"),
        }
    })?;

    transaction(session, DbError::LedgerConsistencyError, |s| {
        if !script.trim().is_empty() {
            s.run_batch(script)
                .map_err(|message| DbError::ScriptExecutionError {
                    file: file.file_name().to_string(),
                    message,
                })?;
        }
        s.run_with_version(mutation_sql(file.direction()), version)
            .map_err(|e| {
                DbError::LedgerConsistencyError(format!(
                    "recording {} {}: {e}",
                    file.direction(),
                    file.version()
                ))
            })?;
        Ok(())
    })
}

/// All applied versions, ascending and de-duplicated
pub fn read_versions<S: LedgerSession + ?Sized>(session: &S) -> DbResult<Vec<Version>> {
    let stored = session
        .fetch_versions(SELECT_VERSIONS_SQL)
        .map_err(DbError::LedgerConsistencyError)?;
    let mut versions = stored
        .into_iter()
        .map(from_stored)
        .collect::<DbResult<Vec<_>>>()?;
    versions.sort_unstable();
    versions.dedup();
    Ok(versions)
}

/// Highest applied version
pub fn read_latest<S: LedgerSession + ?Sized>(session: &S) -> DbResult<Option<Version>> {
    session
        .fetch_max_version(SELECT_LATEST_SQL)
        .map_err(DbError::LedgerConsistencyError)?
        .map(from_stored)
        .transpose()
}

/// Write the outcome of a migration into its pipe and close it
pub fn report_outcome(
    db_type: &str,
    file: &MigrationFile,
    result: DbResult<()>,
    pipe: MigrationPipe,
) {
    match result {
        Ok(()) => log::info!(
            "[{}] {} {} ({})",
            db_type,
            file.direction(),
            file.version(),
            file.file_name()
        ),
        Err(err) => {
            log::error!("[{}] {} failed: {}", db_type, file.file_name(), err);
            pipe.error(err);
        }
    }
    pipe.close();
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
