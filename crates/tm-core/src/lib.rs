//! tm-core - Core library for Tidemark
//!
//! This crate provides the migration file model, the pipe used by migration
//! tasks to report progress and errors, connection descriptors, and
//! configuration parsing.

pub mod config;
pub mod connection;
pub mod direction;
pub mod error;
pub mod file;
pub mod loader;
pub mod pipe;

pub use config::{Config, TargetConfig};
pub use connection::ConnectionUrl;
pub use direction::Direction;
pub use error::{CoreError, CoreResult};
pub use file::{MigrationFile, Version};
pub use loader::{create_migration_pair, read_migration_files};
pub use pipe::{pipe, PipeMessage, PipeReader, PipeWriter};
