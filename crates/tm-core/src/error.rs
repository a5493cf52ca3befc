//! Error types for tm-core

use thiserror::Error;

/// Core error type for Tidemark
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Failed to parse configuration file
    #[error("[C002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// C003: Invalid configuration value
    #[error("[C003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C004: File name does not follow `<version>_<name>.<up|down>.sql`
    #[error("[C004] Invalid migration file name '{file_name}': {reason}")]
    InvalidFileName { file_name: String, reason: String },

    /// C005: Two files share the same version and direction
    #[error("[C005] Duplicate migration file for version {version} ({direction}): {first} and {second}")]
    DuplicateFile {
        version: u64,
        direction: String,
        first: String,
        second: String,
    },

    /// C006: Connection descriptor is not `scheme://params`
    #[error("[C006] Invalid connection URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// C007: IO error
    #[error("[C007] IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
