//! Batch planning: which files to apply, and in what order, to move a store
//! from its applied versions toward a target.
//!
//! Down files run first in strictly descending version order, then up files
//! in strictly ascending version order.

use crate::error::{RunError, RunResult};
use std::collections::{BTreeMap, BTreeSet};
use tm_core::{Direction, MigrationFile, Version};

/// Where a batch should leave the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Apply every pending up migration
    Latest,
    /// Revert every applied version
    Zero,
    /// Apply pending ups at or below the version, revert applied versions above it
    Version(Version),
    /// `n > 0`: the next `n` pending ups; `n < 0`: revert the last `|n|` applied versions
    Relative(i64),
}

/// Candidate files indexed by direction and version
struct FileIndex<'a> {
    ups: BTreeMap<Version, &'a MigrationFile>,
    downs: BTreeMap<Version, &'a MigrationFile>,
}

impl<'a> FileIndex<'a> {
    fn build(files: &'a [MigrationFile]) -> RunResult<Self> {
        let mut ups = BTreeMap::new();
        let mut downs = BTreeMap::new();
        for file in files {
            let map = match file.direction() {
                Direction::Up => &mut ups,
                Direction::Down => &mut downs,
            };
            if map.insert(file.version(), file).is_some() {
                return Err(RunError::DuplicateMigration {
                    version: file.version(),
                    direction: file.direction().to_string(),
                });
            }
        }
        Ok(Self { ups, downs })
    }

    fn pending_ups<'s>(
        &'s self,
        applied: &'s BTreeSet<Version>,
    ) -> impl Iterator<Item = &'a MigrationFile> + 's {
        self.ups
            .iter()
            .filter(move |(v, _)| !applied.contains(*v))
            .map(|(_, f)| *f)
    }

    fn down_for(&self, version: Version) -> RunResult<&'a MigrationFile> {
        self.downs
            .get(&version)
            .copied()
            .ok_or(RunError::MissingDownFile { version })
    }

    fn downs_for<I>(&self, versions: I) -> RunResult<Vec<&'a MigrationFile>>
    where
        I: IntoIterator<Item = Version>,
    {
        versions.into_iter().map(|v| self.down_for(v)).collect()
    }
}

/// Compute the ordered batch that moves `applied` toward `target`
pub fn plan_batch(
    files: &[MigrationFile],
    applied: &[Version],
    target: Target,
) -> RunResult<Vec<MigrationFile>> {
    let index = FileIndex::build(files)?;
    let applied: BTreeSet<Version> = applied.iter().copied().collect();

    let batch: Vec<&MigrationFile> = match target {
        Target::Latest => index.pending_ups(&applied).collect(),
        Target::Zero => index.downs_for(applied.iter().rev().copied())?,
        Target::Version(target) => {
            let mut batch =
                index.downs_for(applied.iter().rev().copied().filter(|v| *v > target))?;
            batch.extend(index.pending_ups(&applied).filter(|f| f.version() <= target));
            batch
        }
        Target::Relative(n) if n > 0 => index
            .pending_ups(&applied)
            .take(usize::try_from(n).unwrap_or(usize::MAX))
            .collect(),
        Target::Relative(n) => index.downs_for(
            applied
                .iter()
                .rev()
                .copied()
                .take(usize::try_from(n.unsigned_abs()).unwrap_or(usize::MAX)),
        )?,
    };

    log::debug!(
        "Planned {} step(s) toward {:?} from {} applied version(s)",
        batch.len(),
        target,
        applied.len()
    );
    Ok(batch.into_iter().cloned().collect())
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
