//! TUN/TAP device driver

use super::validation::{validate_cidr, validate_interface_name, validate_mtu};
use super::{check_cancelled, OS_LINUX};
use crate::driver::{downcast_config, BoxedDriver, Driver, DriverConfig, DriverRegistry};
use crate::error::AbbotResult;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::info;

pub const DRIVER_NAME: &str = "tuntap";

/// Device type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TunTapMode {
    #[default]
    Tun,
    Tap,
}

/// TUN/TAP driver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TunTapConfig {
    /// Device name
    pub name: String,
    #[serde(default)]
    pub mode: TunTapMode,
    #[serde(default = "super::default_mtu")]
    pub mtu: u32,
    /// Owning user id
    #[serde(default)]
    pub owner: Option<u32>,
    /// Owning group id
    #[serde(default)]
    pub group: Option<u32>,
    #[serde(default)]
    pub address: Option<String>,
}

impl Default for TunTapConfig {
    fn default() -> Self {
        Self {
            name: "tun0".to_string(),
            mode: TunTapMode::Tun,
            mtu: super::default_mtu(),
            owner: None,
            group: None,
            address: None,
        }
    }
}

impl TunTapConfig {
    pub fn validate(&self) -> AbbotResult<()> {
        validate_interface_name(&self.name)?;
        validate_mtu(self.mtu)?;
        if let Some(address) = &self.address {
            validate_cidr(address)?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct TunTapDriver {
    provider: String,
    config: TunTapConfig,
}

impl Driver for TunTapDriver {
    fn name(&self) -> &str {
        DRIVER_NAME
    }

    fn os(&self) -> &str {
        OS_LINUX
    }

    fn provider(&self) -> &str {
        &self.provider
    }

    fn interface(&self) -> &str {
        &self.config.name
    }

    fn config_value(&self) -> AbbotResult<serde_json::Value> {
        Ok(serde_json::to_value(&self.config)?)
    }
}

fn new_config() -> Box<dyn DriverConfig> {
    Box::new(TunTapConfig::default())
}

fn new_driver(
    ctx: CancellationToken,
    provider: String,
    config: Box<dyn DriverConfig>,
) -> BoxFuture<'static, AbbotResult<BoxedDriver>> {
    async move {
        check_cancelled(&ctx, DRIVER_NAME)?;

        let config: TunTapConfig = downcast_config(DRIVER_NAME, config)?;
        config.validate()?;

        info!("{:?} device {} ready for provider {}", config.mode, config.name, provider);
        Ok(Box::new(TunTapDriver { provider, config }) as BoxedDriver)
    }
    .boxed()
}

/// Register the TUN/TAP driver
pub fn register(registry: &mut DriverRegistry) {
    registry.register(DRIVER_NAME, OS_LINUX, new_driver, new_config);
}
