//! Bounds- and alignment-checked register window
//!
//! [`RegisterWindow`] is the only path from a byte offset to the hardware. Every
//! access is validated against the window span and the natural alignment of
//! the access width before the backing is touched; the raw base pointer never
//! leaves the backing.

use crate::backing::{RegisterBacking, SimulatedBacking};
use crate::error::{RegError, RegResult};
use hps::consts::REGISTER_SPAN;
use hps::register::{AccessWidth, Register};
use std::sync::Arc;
use tracing::trace;

/// Validate an access of `width` at `offset` inside a window of `span` bytes.
///
/// Range is checked before alignment, so an offset that is both past the end
/// and misaligned reports `OutOfRange`.
pub fn validate_access(offset: usize, width: AccessWidth, span: usize) -> RegResult<()> {
    if offset >= span || offset + width.bytes() > span {
        return Err(RegError::OutOfRange { offset, span });
    }
    if offset % width.bytes() != 0 {
        return Err(RegError::Unaligned {
            offset,
            width: width.bytes(),
        });
    }
    Ok(())
}

/// Owned, validated view over a register range.
///
/// The window performs no locking; writers shared between threads go through
/// [`AccessGuard`](crate::guard::AccessGuard).
pub struct RegisterWindow {
    backing: Box<dyn RegisterBacking>,
    span: usize,
}

impl RegisterWindow {
    /// Wrap a backing. The window span is the backing span.
    pub fn new(backing: impl RegisterBacking + 'static) -> Self {
        let span = backing.span();
        Self {
            backing: Box::new(backing),
            span,
        }
    }

    /// Window over a fresh simulated register file of the component's span.
    ///
    /// The returned handle observes the same memory and records every store.
    pub fn simulated() -> (Self, Arc<SimulatedBacking>) {
        let sim = Arc::new(SimulatedBacking::with_log(REGISTER_SPAN));
        (Self::new(Arc::clone(&sim)), sim)
    }

    /// Addressable bytes.
    pub fn span(&self) -> usize {
        self.span
    }

    /// Backing description for logs.
    pub fn describe(&self) -> String {
        self.backing.describe()
    }

    /// Check range, alignment and transport support for an access.
    pub fn check(&self, offset: usize, width: AccessWidth) -> RegResult<()> {
        validate_access(offset, width, self.span)?;
        if !self.backing.supports(width) {
            return Err(RegError::UnsupportedWidth { width });
        }
        Ok(())
    }

    /// Single load of `width` bytes at `offset`.
    ///
    /// # Errors
    /// `OutOfRange` if `offset >= span`, `Unaligned` if `offset` is not a
    /// multiple of the width, `UnsupportedWidth` if the transport cannot
    /// perform the access.
    pub fn read(&self, offset: usize, width: AccessWidth) -> RegResult<u32> {
        self.check(offset, width)?;
        let value = self.backing.load(offset, width)?;
        trace!("read{} {:#x} -> {:#x}", width, offset, value);
        Ok(value)
    }

    /// Single store of `value` (masked to `width`) at `offset`.
    ///
    /// # Errors
    /// Same as [`read`](Self::read).
    pub fn write(&self, offset: usize, width: AccessWidth, value: u32) -> RegResult<()> {
        self.check(offset, width)?;
        trace!("write{} {:#x} <- {:#x}", width, offset, value);
        self.backing.store(offset, width, value & width.mask())
    }

    /// 32-bit load.
    pub fn read32(&self, offset: usize) -> RegResult<u32> {
        self.read(offset, AccessWidth::Word)
    }

    /// 32-bit store.
    pub fn write32(&self, offset: usize, value: u32) -> RegResult<()> {
        self.write(offset, AccessWidth::Word, value)
    }

    /// Load a named register slot.
    pub fn read_register(&self, register: Register) -> RegResult<u32> {
        self.read32(register.offset())
    }

    /// Store a named register slot.
    pub fn write_register(&self, register: Register, value: u32) -> RegResult<()> {
        self.write32(register.offset(), value)
    }
}

impl std::fmt::Debug for RegisterWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterWindow")
            .field("backing", &self.backing.describe())
            .field("span", &self.span)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_access() {
        assert!(validate_access(0x0, AccessWidth::Word, 0x10).is_ok());
        assert!(validate_access(0xC, AccessWidth::Word, 0x10).is_ok());
        assert!(validate_access(0xF, AccessWidth::Byte, 0x10).is_ok());
        assert!(validate_access(0xE, AccessWidth::Half, 0x10).is_ok());

        assert!(matches!(
            validate_access(0x10, AccessWidth::Word, 0x10),
            Err(RegError::OutOfRange {
                offset: 0x10,
                span: 0x10
            })
        ));
        assert!(matches!(
            validate_access(0x1, AccessWidth::Word, 0x10),
            Err(RegError::Unaligned { offset: 1, width: 4 })
        ));
        assert!(matches!(
            validate_access(0x3, AccessWidth::Half, 0x10),
            Err(RegError::Unaligned { offset: 3, width: 2 })
        ));
        // Past the end and misaligned: range wins.
        assert!(matches!(
            validate_access(0x11, AccessWidth::Word, 0x10),
            Err(RegError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_access_must_fit_in_span() {
        // A word starting inside a 6-byte window would run off its end.
        assert!(matches!(
            validate_access(0x4, AccessWidth::Word, 6),
            Err(RegError::OutOfRange { offset: 4, span: 6 })
        ));
        assert!(validate_access(0x4, AccessWidth::Half, 6).is_ok());
    }

    #[test]
    fn test_read_after_write() {
        let (window, _sim) = RegisterWindow::simulated();
        window.write32(0x4, 0xAA).unwrap();
        assert_eq!(window.read32(0x4).unwrap(), 0xAA);
        assert_eq!(window.read_register(Register::Pattern).unwrap(), 0xAA);
    }

    #[test]
    fn test_write_masks_to_width() {
        let (window, sim) = RegisterWindow::simulated();
        window.write(0x8, AccessWidth::Byte, 0x1234).unwrap();
        assert_eq!(window.read32(0x8).unwrap(), 0x34);
        assert_eq!(sim.writes_to(0x8), vec![0x34]);
    }

    #[test]
    fn test_rejected_access_never_reaches_backing() {
        let (window, sim) = RegisterWindow::simulated();
        assert!(window.write32(0x10, 1).is_err());
        assert!(window.write32(0x2, 1).is_err());
        assert!(sim.writes().is_empty());
    }

    #[test]
    fn test_reserved_slot_is_accessible() {
        let (window, _sim) = RegisterWindow::simulated();
        assert!(window.read32(0xC).is_ok());
        assert!(window.write32(0xC, 0xFFFF_FFFF).is_ok());
    }
}
