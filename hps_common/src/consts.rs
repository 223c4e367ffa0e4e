//! System-wide constants for the HPS LED pattern workspace.
//!
//! Single source of truth for the register layout, playback limits and
//! default device paths. Imported by all crates; no duplication permitted.

use static_assertions::const_assert;

/// Control register offset (bit0 = software override of the pattern output).
pub const CONTROL_OFFSET: usize = 0x0;

/// Pattern register offset (low 8 bits = displayed LED pattern).
pub const PATTERN_OFFSET: usize = 0x4;

/// Base rate register offset (low 8 bits = UQ4.4 rate).
pub const RATE_OFFSET: usize = 0x8;

/// Bytes spanned by the component, used or not.
pub const REGISTER_SPAN: usize = 0x10;

/// Width in bytes of every register slot.
pub const REGISTER_WIDTH: usize = 4;

/// Maximum number of playback steps held by a pattern store.
pub const MAX_STEPS: usize = 32;

/// Physical address of the lightweight HPS-to-FPGA bridge window.
pub const DEFAULT_BASE_ADDRESS: u64 = 0xFF20_0000;

/// Physical memory device used by the devmem transport.
pub const DEFAULT_DEVMEM_PATH: &str = "/dev/mem";

/// Character device node exported by the platform driver.
pub const DEFAULT_CHARDEV_PATH: &str = "/dev/hps_led_patterns";

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/hps_led/patterns.toml";

const_assert!(CONTROL_OFFSET % REGISTER_WIDTH == 0);
const_assert!(PATTERN_OFFSET % REGISTER_WIDTH == 0);
const_assert!(RATE_OFFSET % REGISTER_WIDTH == 0);
const_assert!(RATE_OFFSET < REGISTER_SPAN);
const_assert!(REGISTER_SPAN % REGISTER_WIDTH == 0);
