//! Driver registry and driver contracts
//!
//! Drivers are looked up by logical name and target operating system. Each
//! registered entry carries two factories:
//! - a config factory producing a fresh default configuration payload
//! - a driver factory building a driver from a populated payload
//!
//! The host fills the registry once at startup and shares it read-only
//! afterwards.

pub mod registry;
pub mod types;

pub use registry::{ConfigFactory, DriverFactory, DriverKey, DriverRegistry};
pub use types::{downcast_config, BoxedDriver, Driver, DriverConfig};
