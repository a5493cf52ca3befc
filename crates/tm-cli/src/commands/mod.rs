//! CLI command implementations

pub(crate) mod common;
pub(crate) mod create;
pub(crate) mod down;
pub(crate) mod fleet;
pub(crate) mod goto;
pub(crate) mod migrate;
pub(crate) mod redo;
pub(crate) mod up;
pub(crate) mod version;
pub(crate) mod versions;
