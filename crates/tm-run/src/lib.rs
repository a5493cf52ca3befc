//! tm-run - Migration runner for Tidemark
//!
//! Plans the ordered batch that moves a store toward a [`Target`], applies it
//! one file at a time through a driver, and fans the same target out across
//! a fleet of independent stores.

pub mod error;
pub mod fleet;
pub mod plan;
pub mod runner;

pub use error::{RunError, RunResult};
pub use fleet::{migrate_fleet, StoreOutcome};
pub use plan::{plan_batch, Target};
pub use runner::{BatchReport, Orchestrator, StepReport};
