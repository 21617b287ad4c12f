//! Error types for abbot

use std::io;
use thiserror::Error;

use crate::driver::DriverKey;

#[derive(Debug, Error)]
pub enum AbbotError {
    /// No driver registered for the requested name/os pair
    #[error("driver {name} on {os} not found")]
    DriverNotFound { name: String, os: String },
    /// Driver configuration rejected by its factory
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    /// Config value handed to a factory belongs to another driver
    #[error("Config type mismatch for driver {driver}: expected {expected}")]
    ConfigTypeMismatch { driver: String, expected: &'static str },
    /// Construction cancelled through the caller's token
    #[error("Cancelled: {0}")]
    Cancelled(String),
    /// Host configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Parse error
    #[error("Parse error: {0}")]
    ParseError(String),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl AbbotError {
    /// Shorthand for the lookup failure of `name` on `os`
    pub fn driver_not_found(name: &str, os: &str) -> Self {
        AbbotError::DriverNotFound {
            name: name.to_string(),
            os: os.to_string(),
        }
    }

    /// Whether this error is a registry lookup failure
    pub fn is_driver_not_found(&self) -> bool {
        matches!(self, AbbotError::DriverNotFound { .. })
    }

    /// The missing pair carried by a `DriverNotFound` error
    pub fn driver_key(&self) -> Option<DriverKey> {
        match self {
            AbbotError::DriverNotFound { name, os } => Some(DriverKey::new(name, os)),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AbbotError {
    fn from(error: serde_json::Error) -> Self {
        AbbotError::ParseError(error.to_string())
    }
}

pub type AbbotResult<T> = Result<T, AbbotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_not_found_message() {
        let err = AbbotError::driver_not_found("bridge", "linux");
        assert_eq!(err.to_string(), "driver bridge on linux not found");
        assert!(err.is_driver_not_found());
        assert_eq!(err.driver_key(), Some(DriverKey::new("bridge", "linux")));
    }

    #[test]
    fn test_other_errors_carry_no_key() {
        let err = AbbotError::InvalidConfig("mtu must be positive".to_string());
        assert!(!err.is_driver_not_found());
        assert!(err.driver_key().is_none());
    }
}
