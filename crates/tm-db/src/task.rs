//! Dispatching `migrate` as an independent task bound to a fresh pipe

use crate::error::DbError;
use crate::traits::Driver;
use std::sync::Arc;
use tm_core::pipe::{errors_only, pipe, PipeMessage, PipeReader};
use tm_core::MigrationFile;
use tokio::task::JoinHandle;

/// Handle to one in-flight migration.
///
/// The task cannot be cancelled; [`MigrationTask::wait`] is the only way to
/// learn its outcome.
#[derive(Debug)]
pub struct MigrationTask {
    reader: PipeReader<DbError>,
    handle: JoinHandle<()>,
}

/// Spawn `driver.migrate(file, ..)` on the runtime and return its handle
pub fn dispatch(driver: &Arc<dyn Driver>, file: MigrationFile) -> MigrationTask {
    let (writer, reader) = pipe();
    let driver = Arc::clone(driver);
    let handle = tokio::spawn(async move {
        driver.migrate(file, writer).await;
    });
    MigrationTask { reader, handle }
}

impl MigrationTask {
    /// Drain the pipe until the task closes it, then join the task.
    ///
    /// A task that panicked surfaces as a trailing `TaskFailed` error.
    pub async fn wait(self) -> Vec<PipeMessage<DbError>> {
        let mut messages = self.reader.drain().await;
        if let Err(join_err) = self.handle.await {
            log::error!("Migration task join error: {}", join_err);
            messages.push(PipeMessage::Error(DbError::TaskFailed(join_err.to_string())));
        }
        messages
    }

    /// Wait for the task and keep only its errors
    pub async fn errors(self) -> Vec<DbError> {
        errors_only(self.wait().await)
    }
}

#[cfg(test)]
#[path = "task_test.rs"]
mod tests;
