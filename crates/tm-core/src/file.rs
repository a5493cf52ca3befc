//! Migration file model and file-name parsing

use crate::direction::Direction;
use crate::error::{CoreError, CoreResult};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Migration version number, typically a `%Y%m%d%H%M%S` timestamp
pub type Version = u64;

/// Extension every migration file carries
pub const SQL_EXTENSION: &str = "sql";

/// One migration script plus its metadata.
///
/// Immutable once constructed. An up/down pair for the same change shares a
/// version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    path: PathBuf,
    file_name: String,
    version: Version,
    name: String,
    direction: Direction,
    content: Vec<u8>,
}

impl MigrationFile {
    /// Build a migration file from already-parsed parts
    pub fn new(
        path: impl Into<PathBuf>,
        file_name: impl Into<String>,
        version: Version,
        name: impl Into<String>,
        direction: Direction,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            path: path.into(),
            file_name: file_name.into(),
            version,
            name: name.into(),
            direction,
            content: content.into(),
        }
    }

    /// Build a migration file from its name and content, deriving version,
    /// name and direction from the file name
    pub fn from_parts(
        dir: &Path,
        file_name: &str,
        content: impl Into<Vec<u8>>,
    ) -> CoreResult<Self> {
        let parsed = parse_file_name(file_name)?;
        Ok(Self::new(
            dir.join(file_name),
            file_name,
            parsed.version,
            parsed.name,
            parsed.direction,
            content,
        ))
    }

    /// Read a migration file from disk
    pub fn read(path: &Path) -> CoreResult<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| CoreError::InvalidFileName {
                file_name: path.display().to_string(),
                reason: "file name is not valid UTF-8".to_string(),
            })?;
        let parsed = parse_file_name(file_name)?;
        let content = std::fs::read(path)?;
        Ok(Self::new(
            path,
            file_name,
            parsed.version,
            parsed.name,
            parsed.direction,
            content,
        ))
    }

    /// Source location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Original file name, for display
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Human label
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Raw script bytes
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Script content as text, replacing invalid UTF-8 sequences
    pub fn content_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}

/// Metadata extracted from a migration file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFileName {
    pub version: Version,
    pub name: String,
    pub direction: Direction,
}

/// Parse `<version>_<name>.<up|down>.sql`
pub fn parse_file_name(file_name: &str) -> CoreResult<ParsedFileName> {
    let invalid = |reason: &str| CoreError::InvalidFileName {
        file_name: file_name.to_string(),
        reason: reason.to_string(),
    };

    let stem = file_name
        .strip_suffix(SQL_EXTENSION)
        .and_then(|s| s.strip_suffix('.'))
        .ok_or_else(|| invalid("expected a .sql extension"))?;

    let (rest, direction) = stem
        .rsplit_once('.')
        .ok_or_else(|| invalid("missing .up or .down before .sql"))?;
    let direction: Direction = direction.parse().map_err(|e: String| invalid(&e))?;

    let (version, name) = rest
        .split_once('_')
        .ok_or_else(|| invalid("expected <version>_<name>"))?;
    if version.is_empty() || !version.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("version must be an unsigned integer"));
    }
    let version: Version = version
        .parse()
        .map_err(|_| invalid("version does not fit in 64 bits"))?;
    if name.is_empty() {
        return Err(invalid("name must not be empty"));
    }

    Ok(ParsedFileName {
        version,
        name: name.to_string(),
        direction,
    })
}

/// Build the canonical file name for a migration
pub fn file_name_for(version: Version, name: &str, direction: Direction) -> String {
    format!("{}_{}.{}.{}", version, name, direction, SQL_EXTENSION)
}

#[cfg(test)]
#[path = "file_test.rs"]
mod tests;
