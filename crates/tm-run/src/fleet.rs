//! Fan-out of one batch target across many independent stores.
//!
//! Every store gets its own driver instance and runs in its own task. A
//! semaphore bounds how many stores are in flight at once. Stores share
//! nothing but the read-only file list, so one store's failure never touches
//! another's outcome.

use crate::error::{RunError, RunResult};
use crate::plan::Target;
use crate::runner::{BatchReport, Orchestrator};
use std::sync::Arc;
use tm_core::{ConnectionUrl, MigrationFile};
use tm_db::{DbError, DriverRegistry};
use tokio::sync::Semaphore;

/// Result for a single store in a fleet run
#[derive(Debug)]
pub struct StoreOutcome {
    pub name: String,
    pub result: RunResult<BatchReport>,
}

impl StoreOutcome {
    /// True when the store connected and its whole batch committed
    pub fn is_success(&self) -> bool {
        matches!(&self.result, Ok(report) if report.is_success())
    }
}

/// Migrate every store toward `target`, at most `threads` at a time.
///
/// Outcomes come back in the order of `stores`.
pub async fn migrate_fleet(
    registry: &DriverRegistry,
    stores: Vec<(String, ConnectionUrl)>,
    files: Arc<Vec<MigrationFile>>,
    target: Target,
    threads: usize,
) -> Vec<StoreOutcome> {
    let semaphore = Arc::new(Semaphore::new(threads.max(1)));
    let mut pending = Vec::with_capacity(stores.len());

    for (name, url) in stores {
        let driver = match registry.create(&url) {
            Ok(driver) => driver,
            Err(e) => {
                pending.push((name, Err(RunError::from(e))));
                continue;
            }
        };

        let semaphore = Arc::clone(&semaphore);
        let files = Arc::clone(&files);
        let store = name.clone();
        let handle = tokio::spawn(async move {
            let _permit = match semaphore.acquire().await {
                Ok(permit) => permit,
                Err(_) => {
                    return Err(RunError::Db(DbError::TaskFailed(
                        "fleet semaphore closed".to_string(),
                    )))
                }
            };

            driver.initialize(&url).await?;
            log::info!("[{}] connected via {}", store, driver.db_type());

            let result = Orchestrator::new(Arc::clone(&driver))
                .migrate_to(&files, target)
                .await;

            if let Err(e) = driver.close().await {
                log::warn!("[{}] close failed: {}", store, e);
            }
            result
        });
        pending.push((name, Ok(handle)));
    }

    let mut outcomes = Vec::with_capacity(pending.len());
    for (name, spawned) in pending {
        let result = match spawned {
            Ok(handle) => match handle.await {
                Ok(result) => result,
                Err(e) => {
                    log::error!("[{}] task join error: {}", name, e);
                    Err(RunError::Db(DbError::TaskFailed(e.to_string())))
                }
            },
            Err(e) => Err(e),
        };

        match &result {
            Ok(report) if report.is_success() => {
                log::info!("[{}] {} step(s) applied", name, report.steps.len())
            }
            Ok(report) => log::warn!(
                "[{}] halted at {}",
                name,
                report
                    .failure()
                    .map(|s| s.file_name.as_str())
                    .unwrap_or("<unknown>")
            ),
            Err(e) => log::warn!("[{}] {}", name, e),
        }
        outcomes.push(StoreOutcome { name, result });
    }
    outcomes
}

#[cfg(test)]
#[path = "fleet_test.rs"]
mod tests;
