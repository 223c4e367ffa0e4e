//! Prelude module for common re-exports.
//!
//! ```rust
//! use hps_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{
    ConfigError, ConfigLoader, DeviceConfig, LogLevel, PatternsConfig, SharedConfig, Transport,
};

// ─── Register Layout ────────────────────────────────────────────────
pub use crate::consts::{MAX_STEPS, REGISTER_SPAN, REGISTER_WIDTH};
pub use crate::register::{AccessWidth, ControlFlags, Register};

// ─── Rate Codec ─────────────────────────────────────────────────────
pub use crate::fixed::Uq44;
