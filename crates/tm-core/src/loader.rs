//! Discovery of migration files in a directory

use crate::direction::Direction;
use crate::error::{CoreError, CoreResult};
use crate::file::{file_name_for, parse_file_name, MigrationFile, Version, SQL_EXTENSION};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Read every migration file in `dir`.
///
/// Only `*.sql` files are considered; a `.sql` file whose name does not follow
/// `<version>_<name>.<up|down>.sql` is an error. Results are sorted by
/// version, up before down.
pub fn read_migration_files(dir: &Path) -> CoreResult<Vec<MigrationFile>> {
    let mut files = Vec::new();
    let mut seen: HashMap<(Version, Direction), String> = HashMap::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(SQL_EXTENSION) {
            log::debug!("Skipping non-migration file {}", path.display());
            continue;
        }

        let file = MigrationFile::read(&path)?;
        let key = (file.version(), file.direction());
        if let Some(first) = seen.insert(key, file.file_name().to_string()) {
            return Err(CoreError::DuplicateFile {
                version: file.version(),
                direction: file.direction().to_string(),
                first,
                second: file.file_name().to_string(),
            });
        }
        files.push(file);
    }

    files.sort_by_key(|f| (f.version(), f.direction()));
    Ok(files)
}

/// Write an empty up/down pair for a new migration.
///
/// Refuses to overwrite existing files.
pub fn create_migration_pair(
    dir: &Path,
    name: &str,
    version: Version,
) -> CoreResult<(PathBuf, PathBuf)> {
    if name.is_empty() || name.contains(['/', '\\', '.']) || name.chars().any(char::is_whitespace)
    {
        return Err(CoreError::InvalidFileName {
            file_name: name.to_string(),
            reason: "migration name must be non-empty and free of separators, dots and spaces"
                .to_string(),
        });
    }

    let up = dir.join(file_name_for(version, name, Direction::Up));
    let down = dir.join(file_name_for(version, name, Direction::Down));

    // Validate the generated names before touching disk
    for path in [&up, &down] {
        if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
            parse_file_name(file_name)?;
        }
    }

    std::fs::create_dir_all(dir)?;
    for path in [&up, &down] {
        if path.exists() {
            return Err(CoreError::IoError(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("{} already exists", path.display()),
            )));
        }
    }

    std::fs::write(&up, "")?;
    std::fs::write(&down, "")?;
    log::info!("Created {} and {}", up.display(), down.display());
    Ok((up, down))
}

/// Version for a migration created now (`%Y%m%d%H%M%S`, UTC)
pub fn timestamp_version(now: chrono::DateTime<chrono::Utc>) -> Version {
    use chrono::{Datelike, Timelike};

    let date = now.year().max(0) as u64 * 10_000 + now.month() as u64 * 100 + now.day() as u64;
    let time = now.hour() as u64 * 10_000 + now.minute() as u64 * 100 + now.second() as u64;
    date * 1_000_000 + time
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;
