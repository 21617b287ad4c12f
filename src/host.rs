//! Host side of the two-phase construction: config template, populate, build

use crate::config::{AbbotConfig, DriverEntry};
use crate::driver::{BoxedDriver, DriverRegistry};
use crate::error::{AbbotError, AbbotResult};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Build one configured driver
///
/// Fetches a fresh config template from the registry, overlays the entry's
/// settings and hands the result to the driver factory.
pub async fn build_driver(
    registry: &DriverRegistry,
    ctx: &CancellationToken,
    provider: &str,
    entry: &DriverEntry,
    default_os: &str,
) -> AbbotResult<BoxedDriver> {
    let os = entry.os_or(default_os);

    let mut config = registry.new_config(&entry.name, os)?;
    config.merge_value(entry.config_json()?)?;
    debug!("Populated {} config for {}: {:?}", entry.name, os, config);

    let driver = registry.new_driver(ctx, provider, &entry.name, os, config).await?;
    info!("Built {} driver for {} on {}", entry.name, driver.interface(), os);
    Ok(driver)
}

/// Build every driver listed in `config`, stopping at the first failure
pub async fn build_all(
    registry: &DriverRegistry,
    ctx: &CancellationToken,
    config: &AbbotConfig,
) -> AbbotResult<Vec<BoxedDriver>> {
    let mut drivers = Vec::with_capacity(config.drivers.len());
    for entry in &config.drivers {
        drivers.push(build_driver(registry, ctx, &config.provider, entry, &config.os).await?);
    }
    Ok(drivers)
}

/// Default configuration of `name` on `os`, rendered as TOML
pub fn config_template(registry: &DriverRegistry, name: &str, os: &str) -> AbbotResult<String> {
    let mut value = registry.new_config(name, os)?.to_value()?;
    strip_nulls(&mut value);

    toml::to_string_pretty(&value)
        .map_err(|e| AbbotError::ConfigError(format!("Failed to render {} config: {}", name, e)))
}

/// JSON summary of a built driver
pub fn describe(driver: &BoxedDriver) -> AbbotResult<Value> {
    Ok(serde_json::json!({
        "driver": driver.name(),
        "os": driver.os(),
        "provider": driver.provider(),
        "interface": driver.interface(),
        "config": driver.config_value()?,
    }))
}

// TOML has no null
fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}
