//! Configuration types and parsing for tidemark.yml

use crate::connection::ConnectionUrl;
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Config file names probed by [`Config::load`], in order
pub const CONFIG_FILE_NAMES: &[&str] = &["tidemark.yml", "tidemark.yaml"];

/// Project configuration from tidemark.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding `<version>_<name>.<up|down>.sql` files
    #[serde(default = "default_migrations_path")]
    pub migrations_path: String,

    /// Default connection descriptor (`scheme://params`)
    #[serde(default)]
    pub url: Option<String>,

    /// Maximum number of stores migrated concurrently by `fleet`
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Named stores (e.g., dev, staging, prod)
    #[serde(default)]
    pub targets: BTreeMap<String, TargetConfig>,
}

/// A named store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Connection descriptor for this store
    pub url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            migrations_path: default_migrations_path(),
            url: None,
            threads: default_threads(),
            targets: BTreeMap::new(),
        }
    }
}

fn default_migrations_path() -> String {
    "migrations".to_string()
}

fn default_threads() -> usize {
    4
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                message: format!("{}: {}", path.display(), e),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory, falling back to defaults
    /// when no config file exists
    pub fn load(dir: &Path) -> CoreResult<Self> {
        match Self::find_config_file(dir) {
            Some(path) => Self::from_file(&path),
            None => {
                log::debug!("No config file in {}; using defaults", dir.display());
                Ok(Self::default())
            }
        }
    }

    fn find_config_file(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    fn validate(&self) -> CoreResult<()> {
        if self.threads == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "threads must be at least 1".to_string(),
            });
        }
        if let Some(url) = &self.url {
            ConnectionUrl::parse(url)?;
        }
        for (name, target) in &self.targets {
            ConnectionUrl::parse(&target.url).map_err(|e| CoreError::ConfigInvalid {
                message: format!("target '{}': {}", name, e),
            })?;
        }
        Ok(())
    }

    /// Pick the connection descriptor for `target`, or the default `url`
    /// when no target is named
    pub fn resolve_url(&self, target: Option<&str>) -> CoreResult<ConnectionUrl> {
        let raw = match target {
            Some(name) => {
                &self
                    .targets
                    .get(name)
                    .ok_or_else(|| {
                        let available: Vec<&str> =
                            self.targets.keys().map(String::as_str).collect();
                        CoreError::ConfigInvalid {
                            message: format!(
                                "unknown target '{}' (available: {})",
                                name,
                                if available.is_empty() {
                                    "none".to_string()
                                } else {
                                    available.join(", ")
                                }
                            ),
                        }
                    })?
                    .url
            }
            None => self.url.as_ref().ok_or_else(|| CoreError::ConfigInvalid {
                message: "no connection url configured; set `url` or pass --url".to_string(),
            })?,
        };
        ConnectionUrl::parse(raw)
    }

    /// Migrations directory resolved against the project root
    pub fn migrations_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.migrations_path)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
