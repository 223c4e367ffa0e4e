//! # HPS LED Register Window
//!
//! Validated access to the control/status registers of the LED pattern
//! component. Every access goes through a [`RegisterWindow`], which rejects
//! offsets past the window span and offsets that are not naturally aligned
//! for the access width before anything reaches the hardware.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌────────────────┐   ┌──────────────────┐
//! │ attrs /      │   │ AccessGuard  │   │ RegisterWindow │   │ RegisterBacking  │
//! │ RegisterStr. ├──►│ (writer lock)├──►│ (range/align)  ├──►│ devmem | chardev │
//! │ / callers    │   │              │   │                │   │ | simulation     │
//! └──────────────┘   └──────────────┘   └────────────────┘   └──────────────────┘
//! ```
//!
//! ## Register Layout
//!
//! | Offset | Width | Name    | Semantics |
//! |--------|-------|---------|-----------|
//! | `0x0`  | 4     | Control | bit0 = override/enable |
//! | `0x4`  | 4     | Pattern | low 8 bits = displayed pattern |
//! | `0x8`  | 4     | Rate    | low 8 bits = UQ4.4 base rate |
//! | `0xC`  | -     | reserved | no defined effect |
//!
//! ## Usage
//!
//! ```rust
//! use hps_regmap::{AccessGuard, RegError, RegisterWindow};
//!
//! # fn main() -> Result<(), RegError> {
//! let (window, _sim) = RegisterWindow::simulated();
//! let guard = AccessGuard::new(window);
//!
//! guard.write32(0x4, 0xAA)?;
//! assert_eq!(guard.read32(0x4)?, 0xAA);
//!
//! assert!(matches!(guard.write32(0x10, 0), Err(RegError::OutOfRange { .. })));
//! assert!(matches!(guard.write32(0x1, 0), Err(RegError::Unaligned { .. })));
//! # Ok(())
//! # }
//! ```
//!
//! ## Thread Safety
//!
//! - **RegisterWindow**: `Sync`, but performs no locking of its own
//! - **AccessGuard**: writes serialized by one mutex; reads lock-free
//! - **RegisterStream**: one file position per stream; share the guard, not the stream

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod attrs;
pub mod backing;
pub mod error;
pub mod guard;
pub mod platform;
pub mod stream;
pub mod transport;
pub mod window;

pub use backing::{RegisterBacking, SimulatedBacking, WriteRecord};
pub use error::{RegError, RegResult};
pub use guard::{AccessGuard, WindowLock};
pub use platform::{CharDeviceBacking, DevMemBacking};
pub use stream::RegisterStream;
pub use transport::{open_guarded, open_window};
pub use window::{RegisterWindow, validate_access};

/// Initialize a default tracing subscriber for tools and tests
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Install the command-line tools' subscriber.
///
/// The filter is `RUST_LOG` plus `level`; output goes to stderr so stdout
/// carries only tool output. Returns `false` if a subscriber was already set.
pub fn init_cli_tracing(level: tracing::Level, json: bool) -> bool {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::from_default_env().add_directive(level.into());
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);

    if json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}
