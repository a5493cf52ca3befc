//! Error types for tm-run

use thiserror::Error;
use tm_core::CoreError;
use tm_db::DbError;

/// Runner errors
#[derive(Error, Debug)]
pub enum RunError {
    /// An applied version must be reverted but no down file exists (R001)
    #[error("[R001] Version {version} is applied but has no down migration")]
    MissingDownFile { version: u64 },

    /// Two candidate files share a version and direction (R002)
    #[error("[R002] Duplicate {direction} migration for version {version}")]
    DuplicateMigration { version: u64, direction: String },

    /// A step in the batch failed; earlier steps remain applied (R003)
    #[error("[R003] Migration {file_name} failed: {message}")]
    BatchFailed { file_name: String, message: String },

    /// The latest applied version has no up file to re-apply (R004)
    #[error("[R004] Version {version} has no up migration")]
    MissingUpFile { version: u64 },

    /// Driver error outside a migration task
    #[error(transparent)]
    Db(#[from] DbError),

    /// Core error (config, file loading)
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for RunError
pub type RunResult<T> = Result<T, RunError>;
