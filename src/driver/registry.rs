//! Driver registry - maps (driver name, os) to construction factories

use super::types::{BoxedDriver, DriverConfig};
use crate::error::{AbbotError, AbbotResult};
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Identity of a registered driver implementation
///
/// Matching is exact and case sensitive on both fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DriverKey {
    pub name: String,
    pub os: String,
}

impl DriverKey {
    pub fn new(name: impl Into<String>, os: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            os: os.into(),
        }
    }
}

impl fmt::Display for DriverKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.os)
    }
}

/// Produces a fresh, default configuration payload for a driver
pub type ConfigFactory = Arc<dyn Fn() -> Box<dyn DriverConfig> + Send + Sync>;

/// Builds a driver from a populated configuration
///
/// Receives the caller's cancellation token and the provider the driver is
/// built for. Errors are returned to the caller unchanged.
pub type DriverFactory = Arc<
    dyn Fn(CancellationToken, String, Box<dyn DriverConfig>) -> BoxFuture<'static, AbbotResult<BoxedDriver>>
        + Send
        + Sync,
>;

#[derive(Clone)]
struct FactoryEntry {
    new_driver: DriverFactory,
    new_config: ConfigFactory,
}

/// Table of driver factories
///
/// Filled through `register` during startup (which needs `&mut self`), then
/// shared read-only, e.g. behind an `Arc`.
#[derive(Clone, Default)]
pub struct DriverRegistry {
    drivers: HashMap<DriverKey, FactoryEntry>,
}

impl DriverRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the factories for `name` on `os`
    ///
    /// A later registration under the same key replaces the earlier one.
    pub fn register<D, C>(
        &mut self,
        name: impl Into<String>,
        os: impl Into<String>,
        new_driver: D,
        new_config: C,
    ) where
        D: Fn(CancellationToken, String, Box<dyn DriverConfig>) -> BoxFuture<'static, AbbotResult<BoxedDriver>>
            + Send
            + Sync
            + 'static,
        C: Fn() -> Box<dyn DriverConfig> + Send + Sync + 'static,
    {
        let key = DriverKey::new(name, os);
        let entry = FactoryEntry {
            new_driver: Arc::new(new_driver),
            new_config: Arc::new(new_config),
        };

        if self.drivers.insert(key.clone(), entry).is_some() {
            warn!("Driver {} registered again, replacing previous factories", key);
        } else {
            debug!("Registered driver {}", key);
        }
    }

    /// Create a fresh configuration template for `name` on `os`
    pub fn new_config(&self, name: &str, os: &str) -> AbbotResult<Box<dyn DriverConfig>> {
        let entry = self.lookup(name, os)?;
        Ok((entry.new_config)())
    }

    /// Build a driver for `name` on `os` from a populated configuration
    ///
    /// `ctx` and `provider` are passed to the driver factory as given.
    pub async fn new_driver(
        &self,
        ctx: &CancellationToken,
        provider: &str,
        name: &str,
        os: &str,
        config: Box<dyn DriverConfig>,
    ) -> AbbotResult<BoxedDriver> {
        let entry = self.lookup(name, os)?;

        debug!("Constructing driver {} on {} for provider {}", name, os, provider);
        (entry.new_driver)(ctx.clone(), provider.to_string(), config).await
    }

    /// Whether a driver is registered for `name` on `os`
    pub fn contains(&self, name: &str, os: &str) -> bool {
        self.drivers.contains_key(&DriverKey::new(name, os))
    }

    /// All registered keys, sorted by name then os
    pub fn drivers(&self) -> Vec<DriverKey> {
        let mut keys: Vec<DriverKey> = self.drivers.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    fn lookup(&self, name: &str, os: &str) -> AbbotResult<&FactoryEntry> {
        self.drivers
            .get(&DriverKey::new(name, os))
            .ok_or_else(|| AbbotError::driver_not_found(name, os))
    }
}

impl fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("drivers", &self.drivers())
            .finish()
    }
}
