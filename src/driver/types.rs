//! Driver and driver configuration contracts

use crate::error::{AbbotError, AbbotResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::fmt;

/// Network device driver produced by a registered factory
///
/// The host only relies on the identity of the driver and the configuration
/// it was built from; device operations live in the concrete implementations.
pub trait Driver: Send + Sync + fmt::Debug {
    /// Registered driver name (e.g. "bridge")
    fn name(&self) -> &str;

    /// Operating system the driver was registered for
    fn os(&self) -> &str;

    /// Provider this instance was constructed on behalf of
    fn provider(&self) -> &str;

    /// Name of the network interface managed by this instance
    fn interface(&self) -> &str;

    /// Snapshot of the configuration the driver was built with
    fn config_value(&self) -> AbbotResult<Value>;
}

/// Boxed driver as returned by the registry
pub type BoxedDriver = Box<dyn Driver>;

/// Opaque, driver specific configuration payload
///
/// Implemented for every serde type, so a driver only has to declare a plain
/// `#[derive(Serialize, Deserialize)]` struct to take part.
pub trait DriverConfig: Any + Send + Sync + fmt::Debug {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;

    /// Rust type name of the payload, for diagnostics
    fn type_name(&self) -> &'static str;

    /// Overlay externally supplied settings on top of this value
    ///
    /// Keys missing from `value` keep their current setting; nested tables are
    /// merged key by key.
    fn merge_value(&mut self, value: Value) -> AbbotResult<()>;

    /// Serialize the payload as JSON
    fn to_value(&self) -> AbbotResult<Value>;
}

impl<T> DriverConfig for T
where
    T: Serialize + DeserializeOwned + fmt::Debug + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn merge_value(&mut self, value: Value) -> AbbotResult<()> {
        let mut current = serde_json::to_value(&*self)?;
        merge_json(&mut current, value);

        *self = serde_json::from_value(current).map_err(|e| {
            AbbotError::InvalidConfig(format!("{}: {}", std::any::type_name::<T>(), e))
        })?;
        Ok(())
    }

    fn to_value(&self) -> AbbotResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl dyn DriverConfig {
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// Take ownership of a config payload as the concrete type `T`
pub fn downcast_config<T: Any>(driver: &str, config: Box<dyn DriverConfig>) -> AbbotResult<T> {
    config
        .into_any()
        .downcast::<T>()
        .map(|config| *config)
        .map_err(|_| AbbotError::ConfigTypeMismatch {
            driver: driver.to_string(),
            expected: std::any::type_name::<T>(),
        })
}

fn merge_json(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
