//! Driver trait definition

use crate::error::{DbError, DbResult};
use async_trait::async_trait;
use tm_core::{ConnectionUrl, MigrationFile, PipeWriter, Version};

/// Pipe writer handed to [`Driver::migrate`]
pub type MigrationPipe = PipeWriter<DbError>;

/// Storage backend contract, implemented once per target store.
///
/// An instance owns one connection to one store and is not safe for
/// concurrent `migrate` calls; callers must drain one migration's pipe before
/// starting the next on the same instance.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Open the connection and bring the version ledger to its current
    /// layout, upgrading a legacy ledger in a single transaction
    async fn initialize(&self, url: &ConnectionUrl) -> DbResult<()>;

    /// Release the connection
    async fn close(&self) -> DbResult<()>;

    /// Run `file` and record it in the ledger as one atomic unit of work.
    ///
    /// Reports exclusively through `pipe`: a failure writes one error and
    /// leaves the ledger untouched. The pipe is closed when this returns.
    async fn migrate(&self, file: MigrationFile, pipe: MigrationPipe);

    /// Highest applied version, `None` when nothing is applied
    async fn version(&self) -> DbResult<Option<Version>>;

    /// All applied versions, ascending and de-duplicated
    async fn versions(&self) -> DbResult<Vec<Version>>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
