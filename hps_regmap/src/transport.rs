//! Window construction from a device description.
//!
//! Maps the configured [`Transport`] to a backing, the way a driver registry
//! maps a driver name to a factory.

use crate::backing::SimulatedBacking;
use crate::error::RegResult;
use crate::guard::AccessGuard;
use crate::platform::{CharDeviceBacking, DevMemBacking};
use crate::window::RegisterWindow;
use hps::config::{DeviceConfig, Transport};
use tracing::info;

/// Open the register window described by `device`.
///
/// # Errors
/// `MappingFailure` if the device node cannot be opened or mapped.
pub fn open_window(device: &DeviceConfig) -> RegResult<RegisterWindow> {
    let window = match device.transport {
        Transport::DevMem => RegisterWindow::new(DevMemBacking::open(
            &device.device_path(),
            device.base_address,
            device.span,
        )?),
        Transport::CharDev => {
            RegisterWindow::new(CharDeviceBacking::open(&device.device_path(), device.span)?)
        }
        Transport::Simulation => RegisterWindow::new(SimulatedBacking::new(device.span)),
    };
    info!("Register window ready: {}", window.describe());
    Ok(window)
}

/// Open the window described by `device` behind an access guard.
pub fn open_guarded(device: &DeviceConfig) -> RegResult<AccessGuard> {
    open_window(device).map(AccessGuard::new)
}
