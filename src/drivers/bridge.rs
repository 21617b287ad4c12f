//! Bridge driver

use super::validation::{validate_cidr, validate_interface_name, validate_mtu};
use super::{check_cancelled, OS_LINUX};
use crate::driver::{downcast_config, BoxedDriver, Driver, DriverConfig, DriverRegistry};
use crate::error::AbbotResult;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::info;

pub const DRIVER_NAME: &str = "bridge";

/// Bridge driver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Bridge interface name
    pub name: String,
    /// Interface MTU
    #[serde(default = "super::default_mtu")]
    pub mtu: u32,
    /// Member interfaces to enslave to the bridge
    #[serde(default)]
    pub members: Vec<String>,
    /// Enable Spanning Tree Protocol
    #[serde(default)]
    pub stp: bool,
    /// IP address with prefix (e.g., 192.168.1.1/24)
    #[serde(default)]
    pub address: Option<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            name: "abbot0".to_string(),
            mtu: super::default_mtu(),
            members: Vec::new(),
            stp: false,
            address: None,
        }
    }
}

impl BridgeConfig {
    /// Validate bridge configuration
    pub fn validate(&self) -> AbbotResult<()> {
        validate_interface_name(&self.name)?;
        validate_mtu(self.mtu)?;

        for member in &self.members {
            validate_interface_name(member)?;
        }

        if let Some(address) = &self.address {
            validate_cidr(address)?;
        }

        Ok(())
    }
}

/// Linux bridge
#[derive(Debug)]
pub struct BridgeDriver {
    provider: String,
    config: BridgeConfig,
}

impl Driver for BridgeDriver {
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
    Box::new(BridgeConfig::default())
}

fn new_driver(
    ctx: CancellationToken,
    provider: String,
    config: Box<dyn DriverConfig>,
) -> BoxFuture<'static, AbbotResult<BoxedDriver>> {
    async move {
        check_cancelled(&ctx, DRIVER_NAME)?;

        let config: BridgeConfig = downcast_config(DRIVER_NAME, config)?;
        config.validate()?;

        info!("Bridge {} ready for provider {} ({} members)", config.name, provider, config.members.len());
        Ok(Box::new(BridgeDriver { provider, config }) as BoxedDriver)
    }
    .boxed()
}

/// Register the bridge driver
pub fn register(registry: &mut DriverRegistry) {
    registry.register(DRIVER_NAME, OS_LINUX, new_driver, new_config);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AbbotError;

    fn registry() -> DriverRegistry {
        let mut registry = DriverRegistry::new();
        register(&mut registry);
        registry
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(BridgeConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_bridge_config() {
        let mut config = BridgeConfig {
            name: "br0".to_string(),
            members: vec!["eth0".to_string(), "eth1".to_string()],
            address: Some("192.168.1.1/24".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        config.members.push("eth2; reboot".to_string());
        assert!(config.validate().is_err());

        config.members.pop();
        config.mtu = 0;
        assert!(config.validate().is_err());

        config.mtu = 1500;
        config.address = Some("192.168.1.1".to_string());
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_build_bridge() {
        let registry = registry();
        let ctx = CancellationToken::new();

        let mut config = registry.new_config(DRIVER_NAME, OS_LINUX).unwrap();
        config
            .merge_value(serde_json::json!({ "name": "br-lan", "members": ["eth0"], "stp": true }))
            .unwrap();

        let driver = registry
            .new_driver(&ctx, "pod-a", DRIVER_NAME, OS_LINUX, config)
            .await
            .unwrap();

        assert_eq!(driver.name(), "bridge");
        assert_eq!(driver.interface(), "br-lan");
        assert_eq!(driver.provider(), "pod-a");

        let value = driver.config_value().unwrap();
        assert_eq!(value["mtu"], 1500);
        assert_eq!(value["stp"], true);
    }

    #[tokio::test]
    async fn test_cancelled_before_construction() {
        let registry = registry();
        let ctx = CancellationToken::new();
        ctx.cancel();

        let config = registry.new_config(DRIVER_NAME, OS_LINUX).unwrap();
        let err = registry
            .new_driver(&ctx, "pod-a", DRIVER_NAME, OS_LINUX, config)
            .await
            .unwrap_err();
        assert!(matches!(err, AbbotError::Cancelled(_)));
    }

    #[tokio::test]
    async fn test_foreign_config_rejected() {
        let registry = registry();
        let ctx = CancellationToken::new();

        let config: Box<dyn DriverConfig> = Box::new(super::super::vlan::VlanConfig::default());
        let err = registry
            .new_driver(&ctx, "pod-a", DRIVER_NAME, OS_LINUX, config)
            .await
            .unwrap_err();
        assert!(matches!(err, AbbotError::ConfigTypeMismatch { .. }));
    }
}
