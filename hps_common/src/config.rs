//! Configuration loading traits and types.
//!
//! This module provides a standardized way to load TOML configuration files
//! across the HPS LED tools, and the device description both tools share.
//!
//! # Usage
//!
//! ```rust,no_run
//! use hps_common::config::{ConfigLoader, PatternsConfig, ConfigError};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = PatternsConfig::load(Path::new("patterns.toml"))?;
//!     config.validate()?;
//!     println!("Service: {}", config.shared.service_name);
//!     Ok(())
//! }
//! ```

use crate::consts::{
    DEFAULT_BASE_ADDRESS, DEFAULT_CHARDEV_PATH, DEFAULT_CONFIG_PATH, DEFAULT_DEVMEM_PATH, REGISTER_SPAN,
    REGISTER_WIDTH,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for configuration loading operations.
///
/// This enum represents all possible errors that can occur when loading
/// configuration files.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Represents the verbosity level of logging output.
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, detailed tracing information.
    Trace,
    /// Debug information useful during development.
    Debug,
    /// General information about application operation.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

fn default_service_name() -> String {
    "hps_led_patterns".to_string()
}

/// Common configuration fields shared across the HPS LED tools.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "hps-led-bench-01"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Application instance identifier.
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            service_name: default_service_name(),
        }
    }
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if:
    /// - `service_name` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// How the register window reaches the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Map the bridge window out of the physical memory device.
    #[default]
    DevMem,
    /// Positioned 32-bit reads/writes on the platform driver's device node.
    CharDev,
    /// In-process register file, no hardware involved.
    Simulation,
}

/// Location and shape of the register window.
///
/// # TOML Example
///
/// ```toml
/// [device]
/// transport = "devmem"
/// base_address = 0xFF200000
/// span = 0x10
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceConfig {
    /// Access transport.
    pub transport: Transport,
    /// Physical base address of the component (devmem only).
    pub base_address: u64,
    /// Bytes addressable through the window.
    pub span: usize,
    /// Device node; defaults per transport when absent.
    pub path: Option<PathBuf>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            transport: Transport::default(),
            base_address: DEFAULT_BASE_ADDRESS,
            span: REGISTER_SPAN,
            path: None,
        }
    }
}

impl DeviceConfig {
    /// Device node for the configured transport.
    pub fn device_path(&self) -> PathBuf {
        match (&self.path, self.transport) {
            (Some(path), _) => path.clone(),
            (None, Transport::CharDev) => PathBuf::from(DEFAULT_CHARDEV_PATH),
            (None, _) => PathBuf::from(DEFAULT_DEVMEM_PATH),
        }
    }

    /// Validate window geometry.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if the span is empty or not a
    /// whole number of registers, or the base address is not word aligned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.span == 0 {
            return Err(ConfigError::ValidationError(
                "span cannot be zero".to_string(),
            ));
        }
        if self.span % REGISTER_WIDTH != 0 {
            return Err(ConfigError::ValidationError(format!(
                "span {:#x} is not a multiple of {REGISTER_WIDTH}",
                self.span
            )));
        }
        if self.base_address % REGISTER_WIDTH as u64 != 0 {
            return Err(ConfigError::ValidationError(format!(
                "base address {:#x} is not {REGISTER_WIDTH}-byte aligned",
                self.base_address
            )));
        }
        Ok(())
    }
}

/// Configuration file read by both binaries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternsConfig {
    /// Common service settings.
    pub shared: SharedConfig,
    /// Register window description.
    pub device: DeviceConfig,
}

impl PatternsConfig {
    /// Load `path` if given, else the system file if present, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::load(Path::new(DEFAULT_CONFIG_PATH))
            }
            None => Ok(Self::default()),
        }
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.device.validate()
    }
}

/// Trait for loading configuration from TOML files.
///
/// This trait provides a default implementation that works with any type
/// implementing `serde::de::DeserializeOwned`.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML configuration file
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation for all types that implement DeserializeOwned.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_default() {
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }

    #[test]
    fn test_log_level_to_tracing() {
        assert_eq!(tracing::Level::from(LogLevel::Debug), tracing::Level::DEBUG);
        assert_eq!(tracing::Level::from(LogLevel::Error), tracing::Level::ERROR);
    }

    #[test]
    fn test_log_level_deserialization() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct TestWrapper {
            level: LogLevel,
        }

        assert_eq!(
            toml::from_str::<TestWrapper>("level = \"trace\"")
                .unwrap()
                .level,
            LogLevel::Trace
        );
        assert_eq!(
            toml::from_str::<TestWrapper>("level = \"warn\"")
                .unwrap()
                .level,
            LogLevel::Warn
        );
    }

    #[test]
    fn test_shared_config_validation_empty_service_name() {
        let config = SharedConfig {
            log_level: LogLevel::Info,
            service_name: "".to_string(),
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_device_defaults() {
        let device = DeviceConfig::default();
        assert_eq!(device.transport, Transport::DevMem);
        assert_eq!(device.base_address, 0xFF20_0000);
        assert_eq!(device.span, 0x10);
        assert_eq!(device.device_path(), PathBuf::from("/dev/mem"));
        assert!(device.validate().is_ok());
    }

    #[test]
    fn test_device_path_per_transport() {
        let device = DeviceConfig {
            transport: Transport::CharDev,
            ..DeviceConfig::default()
        };
        assert_eq!(device.device_path(), PathBuf::from("/dev/hps_led_patterns"));

        let device = DeviceConfig {
            path: Some(PathBuf::from("/tmp/regs")),
            ..device
        };
        assert_eq!(device.device_path(), PathBuf::from("/tmp/regs"));
    }

    #[test]
    fn test_device_validation() {
        let unaligned_span = DeviceConfig {
            span: 0x0E,
            ..DeviceConfig::default()
        };
        assert!(unaligned_span.validate().is_err());

        let empty = DeviceConfig {
            span: 0,
            ..DeviceConfig::default()
        };
        assert!(empty.validate().is_err());

        let unaligned_base = DeviceConfig {
            base_address: 0xFF20_0002,
            ..DeviceConfig::default()
        };
        assert!(unaligned_base.validate().is_err());
    }

    #[test]
    fn test_patterns_config_without_file() {
        let config = PatternsConfig::load_or_default(None).unwrap();
        assert_eq!(config.shared.service_name, "hps_led_patterns");
        assert!(config.validate().is_ok());
    }
}
