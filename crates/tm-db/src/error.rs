//! Error types for tm-db

use thiserror::Error;

/// Driver errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// The migration script itself failed (D002)
    #[error("[D002] Migration script {file} failed: {message}")]
    ScriptExecutionError { file: String, message: String },

    /// Legacy ledger upgrade failed; the store was left unchanged (D003)
    #[error("[D003] Version ledger upgrade failed: {0}")]
    SchemaUpgradeError(String),

    /// The ledger could not be read or updated (D004)
    #[error("[D004] Version ledger inconsistent: {0}")]
    LedgerConsistencyError(String),

    /// No driver registered for a scheme (D005)
    #[error("[D005] No driver registered for scheme '{scheme}' (available: {available})")]
    UnknownScheme { scheme: String, available: String },

    /// Operation on a driver that is not initialized or already closed (D006)
    #[error("[D006] {backend} driver is not connected")]
    NotConnected { backend: &'static str },

    /// Mutex poisoned (D007)
    #[error("[D007] Database mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// Version does not fit the ledger column (D008)
    #[error("[D008] Invalid version: {0}")]
    InvalidVersion(String),

    /// A migration task ended without closing its pipe cleanly (D009)
    #[error("[D009] Migration task failed: {0}")]
    TaskFailed(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl<T> From<std::sync::PoisonError<T>> for DbError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        DbError::MutexPoisoned(err.to_string())
    }
}
