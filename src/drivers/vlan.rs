//! 802.1Q VLAN driver

use super::validation::{validate_cidr, validate_interface_name, validate_mtu, validate_vlan_id};
use super::{check_cancelled, OS_LINUX};
use crate::driver::{downcast_config, BoxedDriver, Driver, DriverConfig, DriverRegistry};
use crate::error::{AbbotError, AbbotResult};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::info;

pub const DRIVER_NAME: &str = "vlan";

/// VLAN driver configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VlanConfig {
    /// Parent (trunk) interface
    #[serde(default)]
    pub parent: String,
    /// 802.1Q tag
    #[serde(default)]
    pub vlan_id: u16,
    /// Interface MTU, inherited from the parent when unset
    #[serde(default)]
    pub mtu: Option<u32>,
    /// Interface name, `<parent>.<vlan_id>` when unset
    #[serde(default)]
    pub name: Option<String>,
    /// IP address with prefix
    #[serde(default)]
    pub address: Option<String>,
}

impl VlanConfig {
    /// Validate VLAN configuration
    pub fn validate(&self) -> AbbotResult<()> {
        if self.parent.is_empty() {
            return Err(AbbotError::InvalidConfig("parent interface is required".to_string()));
        }
        validate_interface_name(&self.parent)?;
        validate_vlan_id(self.vlan_id)?;
        validate_interface_name(&self.interface_name())?;

        if let Some(mtu) = self.mtu {
            validate_mtu(mtu)?;
        }
        if let Some(address) = &self.address {
            validate_cidr(address)?;
        }

        Ok(())
    }

    /// Get VLAN interface name
    pub fn interface_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{}.{}", self.parent, self.vlan_id),
        }
    }
}

/// VLAN sub-interface of a parent link
#[derive(Debug)]
pub struct VlanDriver {
    provider: String,
    interface: String,
    config: VlanConfig,
}

impl Driver for VlanDriver {
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
        &self.interface
    }

    fn config_value(&self) -> AbbotResult<serde_json::Value> {
        Ok(serde_json::to_value(&self.config)?)
    }
}

fn new_config() -> Box<dyn DriverConfig> {
    Box::new(VlanConfig::default())
}

fn new_driver(
    ctx: CancellationToken,
    provider: String,
    config: Box<dyn DriverConfig>,
) -> BoxFuture<'static, AbbotResult<BoxedDriver>> {
    async move {
        check_cancelled(&ctx, DRIVER_NAME)?;

        let config: VlanConfig = downcast_config(DRIVER_NAME, config)?;
        config.validate()?;

        let interface = config.interface_name();
        info!("VLAN {} (id {} on {}) ready for provider {}", interface, config.vlan_id, config.parent, provider);
        Ok(Box::new(VlanDriver { provider, interface, config }) as BoxedDriver)
    }
    .boxed()
}

/// Register the VLAN driver
pub fn register(registry: &mut DriverRegistry) {
    registry.register(DRIVER_NAME, OS_LINUX, new_driver, new_config);
}
