//! Built-in network device drivers
//!
//! Every driver module exposes a `register` function adding its factories to
//! a [`DriverRegistry`]. The set of drivers a binary offers is whatever
//! `register_builtin` (or the host's own startup code) registers:
//! - bridge: Linux bridges with member interfaces
//! - vlan: 802.1Q sub-interfaces
//! - tuntap: TUN/TAP virtual devices

use crate::driver::DriverRegistry;
use crate::error::{AbbotError, AbbotResult};
use tokio_util::sync::CancellationToken;

pub mod validation;

pub mod bridge;
pub mod tuntap;
pub mod vlan;

pub use bridge::{BridgeConfig, BridgeDriver};
pub use tuntap::{TunTapConfig, TunTapDriver, TunTapMode};
pub use vlan::{VlanConfig, VlanDriver};

/// OS key the built-in drivers register under
pub const OS_LINUX: &str = "linux";

/// Register every built-in driver
pub fn register_builtin(registry: &mut DriverRegistry) {
    bridge::register(registry);
    vlan::register(registry);
    tuntap::register(registry);
}

fn default_mtu() -> u32 {
    1500
}

fn check_cancelled(ctx: &CancellationToken, driver: &str) -> AbbotResult<()> {
    if ctx.is_cancelled() {
        return Err(AbbotError::Cancelled(format!("construction of {} driver", driver)));
    }
    Ok(())
}
