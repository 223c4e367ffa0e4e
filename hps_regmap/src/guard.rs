//! Serialized access to a shared register window
//!
//! [`AccessGuard`] owns a [`RegisterWindow`] and funnels every mutating access
//! through one mutex, so writes to the window are totally ordered by lock
//! acquisition. Plain reads skip the lock: a single aligned load is atomic on
//! its own. Acquisition blocks; callers that need a bounded wait must layer a
//! timeout above this type.

use crate::error::RegResult;
use crate::window::RegisterWindow;
use hps::register::{AccessWidth, Register};
use parking_lot::{Mutex, MutexGuard};

/// Register window with a writer lock.
#[derive(Debug)]
pub struct AccessGuard {
    window: RegisterWindow,
    lock: Mutex<()>,
}

impl AccessGuard {
    /// Take ownership of `window`.
    pub fn new(window: RegisterWindow) -> Self {
        Self {
            window,
            lock: Mutex::new(()),
        }
    }

    /// Addressable bytes.
    pub fn span(&self) -> usize {
        self.window.span()
    }

    /// Backing description for logs.
    pub fn describe(&self) -> String {
        self.window.describe()
    }

    /// Lock-free single load.
    pub fn read(&self, offset: usize, width: AccessWidth) -> RegResult<u32> {
        self.window.read(offset, width)
    }

    /// Lock-free 32-bit load.
    pub fn read32(&self, offset: usize) -> RegResult<u32> {
        self.window.read32(offset)
    }

    /// Lock-free load of a named register.
    pub fn read_register(&self, register: Register) -> RegResult<u32> {
        self.window.read_register(register)
    }

    /// Serialized single store.
    pub fn write(&self, offset: usize, width: AccessWidth, value: u32) -> RegResult<()> {
        self.lock().write(offset, width, value)
    }

    /// Serialized 32-bit store.
    pub fn write32(&self, offset: usize, value: u32) -> RegResult<()> {
        self.write(offset, AccessWidth::Word, value)
    }

    /// Serialized store to a named register.
    pub fn write_register(&self, register: Register, value: u32) -> RegResult<()> {
        self.write32(register.offset(), value)
    }

    /// Read-modify-write inside one critical section. Returns the stored value.
    pub fn modify<F>(&self, offset: usize, width: AccessWidth, f: F) -> RegResult<u32>
    where
        F: FnOnce(u32) -> u32,
    {
        let held = self.lock();
        let value = f(held.read(offset, width)?);
        held.write(offset, width, value)?;
        Ok(value)
    }

    /// Acquire the writer lock for a sequence of accesses.
    pub fn lock(&self) -> WindowLock<'_> {
        WindowLock {
            window: &self.window,
            _held: self.lock.lock(),
        }
    }

    /// Acquire the writer lock only if it is free.
    pub fn try_lock(&self) -> Option<WindowLock<'_>> {
        self.lock.try_lock().map(|held| WindowLock {
            window: &self.window,
            _held: held,
        })
    }
}

/// Exclusive writer access to the window, released on drop.
pub struct WindowLock<'a> {
    window: &'a RegisterWindow,
    _held: MutexGuard<'a, ()>,
}

impl WindowLock<'_> {
    /// Single load while holding the lock.
    pub fn read(&self, offset: usize, width: AccessWidth) -> RegResult<u32> {
        self.window.read(offset, width)
    }

    /// Single store while holding the lock.
    pub fn write(&self, offset: usize, width: AccessWidth, value: u32) -> RegResult<()> {
        self.window.write(offset, width, value)
    }
}
