//! Configuration file loading tests.
//!
//! Exercises `PatternsConfig` through `ConfigLoader` against real TOML files:
//! full files, partial files relying on defaults, unknown keys and
//! geometry validation.

use hps_common::config::{ConfigError, ConfigLoader, LogLevel, PatternsConfig, Transport};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Write `content` into a fresh temporary file.
fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{content}").unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_full_config() {
    let file = write_config(
        r#"
[shared]
log_level = "debug"
service_name = "bench-board"

[device]
transport = "chardev"
base_address = 0xFF200000
span = 0x10
path = "/dev/hps_led_patterns0"
"#,
    );

    let config = PatternsConfig::load(file.path()).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.shared.log_level, LogLevel::Debug);
    assert_eq!(config.shared.service_name, "bench-board");
    assert_eq!(config.device.transport, Transport::CharDev);
    assert_eq!(config.device.base_address, 0xFF20_0000);
    assert_eq!(
        config.device.device_path(),
        PathBuf::from("/dev/hps_led_patterns0")
    );
}

#[test]
fn test_partial_config_uses_defaults() {
    let file = write_config(
        r#"
[device]
transport = "simulation"
"#,
    );

    let config = PatternsConfig::load(file.path()).unwrap();
    assert_eq!(config.device.transport, Transport::Simulation);
    assert_eq!(config.device.span, 0x10);
    assert_eq!(config.shared.log_level, LogLevel::Info);
    assert_eq!(config.shared.service_name, "hps_led_patterns");
}

#[test]
fn test_empty_file_is_default() {
    let file = write_config("");
    let config = PatternsConfig::load(file.path()).unwrap();
    assert_eq!(config.device.transport, Transport::DevMem);
    assert!(config.validate().is_ok());
}

#[test]
fn test_unknown_device_key_rejected() {
    let file = write_config(
        r#"
[device]
base_adress = 0xFF200000
"#,
    );
    assert!(matches!(
        PatternsConfig::load(file.path()),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn test_unknown_transport_rejected() {
    let file = write_config(
        r#"
[device]
transport = "uio"
"#,
    );
    assert!(matches!(
        PatternsConfig::load(file.path()),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn test_invalid_span_fails_validation() {
    let file = write_config(
        r#"
[device]
span = 6
"#,
    );
    let config = PatternsConfig::load(file.path()).unwrap();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError(_))
    ));
}

#[test]
fn test_missing_file() {
    let result = PatternsConfig::load(Path::new("/nonexistent/path/patterns.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound)));

    let result = PatternsConfig::load_or_default(Some(Path::new("/nonexistent/patterns.toml")));
    assert!(matches!(result, Err(ConfigError::FileNotFound)));
}
