//! tm-db - Database drivers for Tidemark
//!
//! This crate provides the `Driver` trait, the version ledger shared by all
//! SQL backends, DuckDB and SQLite drivers, the scheme registry used to pick
//! a driver from a connection URL, and task dispatch for `migrate`.

pub mod duckdb;
pub mod error;
pub mod ledger;
pub mod registry;
pub mod sqlite;
pub mod task;
pub mod traits;

pub use crate::duckdb::DuckDbDriver;
pub use error::{DbError, DbResult};
pub use ledger::LedgerLayout;
pub use registry::{DriverConstructor, DriverRegistry};
pub use sqlite::SqliteDriver;
pub use task::{dispatch, MigrationTask};
pub use traits::{Driver, MigrationPipe};
