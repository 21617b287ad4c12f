//! abbot - network device driver registry
//!
//! Library backing the abbot container networking plugin:
//! - Driver registry keyed by driver name and operating system
//! - Two-phase construction (config template, then driver from config)
//! - Built-in bridge, VLAN and TUN/TAP drivers
//! - TOML host configuration listing the drivers to build

pub mod error;
pub mod driver;
pub mod drivers;
pub mod config;
pub mod host;

// Re-export commonly used types
pub use error::{AbbotError, AbbotResult};
pub use driver::{
    downcast_config, BoxedDriver, ConfigFactory, Driver, DriverConfig, DriverFactory,
    DriverKey, DriverRegistry,
};
pub use drivers::{register_builtin, OS_LINUX};
pub use config::{AbbotConfig, DriverEntry};
pub use host::{build_all, build_driver, config_template};
