//! Batch execution against a single driver.
//!
//! Every file is dispatched as its own task with a fresh pipe, and that pipe
//! is fully drained before the next file is dispatched. The first failing
//! step halts the batch: earlier steps stay applied, the failing step leaves
//! no trace, and later steps are never dispatched. Nothing is retried or
//! rolled back automatically.

use crate::error::{RunError, RunResult};
use crate::plan::{plan_batch, Target};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tm_core::{Direction, MigrationFile, PipeMessage, Version};
use tm_db::{dispatch, DbError, Driver};

/// Outcome of one dispatched file
#[derive(Debug)]
pub struct StepReport {
    pub version: Version,
    pub direction: Direction,
    pub file_name: String,
    /// Progress notices written by the driver
    pub notices: Vec<String>,
    /// Errors written by the driver; empty on success
    pub errors: Vec<DbError>,
    pub duration: Duration,
}

impl StepReport {
    pub fn succeeded(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Aggregated outcome of a batch
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Dispatched steps, in dispatch order
    pub steps: Vec<StepReport>,
    /// File names never dispatched because an earlier step failed
    pub skipped: Vec<String>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failure().is_none()
    }

    /// The step that halted the batch, if any
    pub fn failure(&self) -> Option<&StepReport> {
        self.steps.iter().find(|s| !s.succeeded())
    }

    /// Steps that committed, in order
    pub fn applied(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|s| s.succeeded())
    }

    /// Versions of the committed steps, in order
    pub fn applied_versions(&self) -> Vec<Version> {
        self.applied().map(|s| s.version).collect()
    }

    /// Turn a failed batch into [`RunError::BatchFailed`]
    pub fn into_result(self) -> RunResult<Self> {
        match self.failure() {
            None => Ok(self),
            Some(step) => Err(RunError::BatchFailed {
                file_name: step.file_name.clone(),
                message: step
                    .errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            }),
        }
    }
}

/// Sequences migration files against one driver instance
#[derive(Clone)]
pub struct Orchestrator {
    driver: Arc<dyn Driver>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("db_type", &self.driver.db_type())
            .finish()
    }
}

impl Orchestrator {
    /// Wrap an already initialized driver
    pub fn new(driver: Arc<dyn Driver>) -> Self {
        Self { driver }
    }

    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    /// Apply `batch` in the given order, halting on the first failure
    pub async fn run_batch(&self, batch: Vec<MigrationFile>) -> BatchReport {
        let mut report = BatchReport::default();
        let mut remaining = batch.into_iter();

        for file in remaining.by_ref() {
            let started = Instant::now();
            let version = file.version();
            let direction = file.direction();
            let file_name = file.file_name().to_string();
            log::debug!("Dispatching {}", file_name);

            let messages = dispatch(&self.driver, file).wait().await;

            let mut notices = Vec::new();
            let mut errors = Vec::new();
            for message in messages {
                match message {
                    PipeMessage::Notice(text) => notices.push(text),
                    PipeMessage::Error(err) => errors.push(err),
                }
            }

            let step = StepReport {
                version,
                direction,
                file_name,
                notices,
                errors,
                duration: started.elapsed(),
            };
            let failed = !step.succeeded();
            report.steps.push(step);
            if failed {
                break;
            }
        }

        report.skipped = remaining.map(|f| f.file_name().to_string()).collect();
        if let Some(step) = report.failure() {
            log::warn!(
                "Batch halted at {}; {} step(s) not dispatched",
                step.file_name,
                report.skipped.len()
            );
        }
        report
    }

    /// Plan the batch toward `target` from the current ledger and run it
    pub async fn migrate_to(
        &self,
        files: &[MigrationFile],
        target: Target,
    ) -> RunResult<BatchReport> {
        let applied = self.driver.versions().await?;
        let batch = plan_batch(files, &applied, target)?;
        Ok(self.run_batch(batch).await)
    }

    /// Revert the latest applied version, then re-apply it
    pub async fn redo(&self, files: &[MigrationFile]) -> RunResult<BatchReport> {
        let applied = self.driver.versions().await?;
        let Some(&latest) = applied.last() else {
            log::info!("Nothing applied; nothing to redo");
            return Ok(BatchReport::default());
        };

        let mut batch = plan_batch(files, &applied, Target::Relative(-1))?;
        let up = files
            .iter()
            .find(|f| f.version() == latest && f.direction() == Direction::Up)
            .ok_or(RunError::MissingUpFile { version: latest })?;
        batch.push(up.clone());
        Ok(self.run_batch(batch).await)
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
