//! Scheme-to-driver factory map.
//!
//! Built once at startup and passed by reference to whatever needs to open
//! stores; there is no global registration.

use crate::duckdb::DuckDbDriver;
use crate::error::{DbError, DbResult};
use crate::sqlite::SqliteDriver;
use crate::traits::Driver;
use std::collections::BTreeMap;
use std::sync::Arc;
use tm_core::ConnectionUrl;

/// Constructor for an unconnected driver
pub type DriverConstructor = fn() -> Arc<dyn Driver>;

/// Maps connection-descriptor schemes to driver constructors
#[derive(Clone, Default)]
pub struct DriverRegistry {
    constructors: BTreeMap<String, DriverConstructor>,
}

impl std::fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("schemes", &self.schemes())
            .finish()
    }
}

impl DriverRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in driver
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(DuckDbDriver::SCHEME, || Arc::new(DuckDbDriver::new()));
        registry.register(SqliteDriver::SCHEME, || Arc::new(SqliteDriver::new()));
        registry
    }

    /// Register (or replace) the constructor for `scheme`
    pub fn register(&mut self, scheme: &str, constructor: DriverConstructor) {
        self.constructors
            .insert(scheme.to_ascii_lowercase(), constructor);
    }

    /// Registered schemes, sorted
    pub fn schemes(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    /// Build an unconnected driver for `url`'s scheme
    pub fn create(&self, url: &ConnectionUrl) -> DbResult<Arc<dyn Driver>> {
        let constructor =
            self.constructors
                .get(url.scheme())
                .ok_or_else(|| DbError::UnknownScheme {
                    scheme: url.scheme().to_string(),
                    available: self.schemes().join(", "),
                })?;
        Ok(constructor())
    }

    /// Build a driver for `url` and initialize it
    pub async fn connect(&self, url: &ConnectionUrl) -> DbResult<Arc<dyn Driver>> {
        let driver = self.create(url)?;
        driver.initialize(url).await?;
        Ok(driver)
    }
}
