//! Configuration management for abbot

use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::{AbbotError, AbbotResult};

/// Main abbot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbbotConfig {
    /// Provider drivers are constructed on behalf of
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Operating system used for entries without their own `os`
    #[serde(default = "default_os")]
    pub os: String,
    /// Drivers to construct, in order
    #[serde(default)]
    pub drivers: Vec<DriverEntry>,
}

/// One `[[drivers]]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverEntry {
    /// Registered driver name
    pub name: String,
    /// Target operating system override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    /// Driver specific settings, overlaid on the driver's config template
    #[serde(default)]
    pub config: toml::Table,
}

fn default_provider() -> String {
    "abbot".to_string()
}

fn default_os() -> String {
    std::env::consts::OS.to_string()
}

impl Default for AbbotConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            os: default_os(),
            drivers: Vec::new(),
        }
    }
}

impl AbbotConfig {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> AbbotResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> AbbotResult<Self> {
        toml::from_str(content)
            .map_err(|e| AbbotError::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> AbbotResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| AbbotError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path.as_ref(), content)?;

        Ok(())
    }
}

impl DriverEntry {
    /// Target operating system, falling back to `default`
    pub fn os_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.os.as_deref().unwrap_or(default)
    }

    /// Driver settings as JSON, ready for `DriverConfig::merge_value`
    pub fn config_json(&self) -> AbbotResult<serde_json::Value> {
        Ok(serde_json::to_value(&self.config)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
provider = "tenant-a"

[[drivers]]
name = "bridge"
[drivers.config]
name = "br0"
members = ["eth0", "eth1"]

[[drivers]]
name = "vlan"
os = "linux"
[drivers.config]
parent = "eth0"
vlan_id = 100
"#;

    #[test]
    fn test_parse_config() {
        let config = AbbotConfig::from_toml_str(SAMPLE).unwrap();

        assert_eq!(config.provider, "tenant-a");
        assert_eq!(config.os, std::env::consts::OS);
        assert_eq!(config.drivers.len(), 2);
        assert_eq!(config.drivers[0].os_or("freebsd"), "freebsd");
        assert_eq!(config.drivers[1].os_or("freebsd"), "linux");

        let json = config.drivers[1].config_json().unwrap();
        assert_eq!(json["vlan_id"], 100);
        assert_eq!(config.drivers[0].config_json().unwrap()["members"][1], "eth1");
    }

    #[test]
    fn test_defaults() {
        let config = AbbotConfig::from_toml_str("").unwrap();
        assert_eq!(config.provider, "abbot");
        assert!(config.drivers.is_empty());
    }

    #[test]
    fn test_invalid_config() {
        let err = AbbotConfig::from_toml_str("drivers = 3").unwrap_err();
        assert!(matches!(err, AbbotError::ConfigError(_)));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("abbot.toml");

        let config = AbbotConfig::from_toml_str(SAMPLE).unwrap();
        config.save(&path).unwrap();

        let loaded = AbbotConfig::load(&path).unwrap();
        assert_eq!(loaded.provider, "tenant-a");
        assert_eq!(loaded.drivers[0].name, "bridge");
        assert!(loaded.drivers[0].os.is_none());
    }

    #[test]
    fn test_missing_file() {
        let err = AbbotConfig::load("/nonexistent/abbot.toml").unwrap_err();
        assert!(matches!(err, AbbotError::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
    }

    #[test]
    fn test_save_into_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("abbot.toml");

        let err = AbbotConfig::default().save(&path).unwrap_err();
        assert!(matches!(err, AbbotError::Io(_)));
    }
}
