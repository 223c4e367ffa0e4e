//! Storage behind a register window.
//!
//! A backing performs raw, already-validated accesses. Offset and alignment
//! checks belong to [`RegisterWindow`](crate::window::RegisterWindow); a
//! backing only reports failures of the transport itself.

use crate::error::RegResult;
use hps::register::AccessWidth;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Raw access to a byte-addressable register range.
pub trait RegisterBacking: Send + Sync {
    /// Addressable bytes.
    fn span(&self) -> usize;

    /// Whether accesses of `width` can be performed. Default: all widths.
    fn supports(&self, _width: AccessWidth) -> bool {
        true
    }

    /// Single load of `width` bytes at `offset`, zero-extended.
    fn load(&self, offset: usize, width: AccessWidth) -> RegResult<u32>;

    /// Single store of the low `width` bytes of `value` at `offset`.
    fn store(&self, offset: usize, width: AccessWidth, value: u32) -> RegResult<()>;

    /// Short human-readable description for logs.
    fn describe(&self) -> String;
}

impl<T: RegisterBacking + ?Sized> RegisterBacking for Arc<T> {
    fn span(&self) -> usize {
        (**self).span()
    }

    fn supports(&self, width: AccessWidth) -> bool {
        (**self).supports(width)
    }

    fn load(&self, offset: usize, width: AccessWidth) -> RegResult<u32> {
        (**self).load(offset, width)
    }

    fn store(&self, offset: usize, width: AccessWidth, value: u32) -> RegResult<()> {
        (**self).store(offset, width, value)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// One store observed by a [`SimulatedBacking`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteRecord {
    /// Byte offset written.
    pub offset: usize,
    /// Access width used.
    pub width: AccessWidth,
    /// Value stored (already masked to `width`).
    pub value: u32,
}

/// In-process register file.
///
/// Memory is a run of atomic little-endian words, so every naturally aligned
/// access of any width is a single atomic operation. A backing built with
/// [`with_log`](Self::with_log) also appends every store to a write log that
/// tests can inspect; [`new`](Self::new) keeps no history, so long-running
/// simulation stays at a fixed size.
#[derive(Debug)]
pub struct SimulatedBacking {
    words: Box<[AtomicU32]>,
    span: usize,
    log: Option<Mutex<Vec<WriteRecord>>>,
}

impl SimulatedBacking {
    /// Create a zero-filled register file of `span` bytes without a write log.
    pub fn new(span: usize) -> Self {
        let words = (0..span.div_ceil(4)).map(|_| AtomicU32::new(0)).collect();
        Self {
            words,
            span,
            log: None,
        }
    }

    /// Create a zero-filled register file of `span` bytes that records stores.
    pub fn with_log(span: usize) -> Self {
        Self {
            log: Some(Mutex::new(Vec::new())),
            ..Self::new(span)
        }
    }

    /// Whether stores are being recorded.
    pub fn is_logging(&self) -> bool {
        self.log.is_some()
    }

    /// Every store seen so far, oldest first. Empty without a log.
    pub fn writes(&self) -> Vec<WriteRecord> {
        self.log
            .as_ref()
            .map(|log| log.lock().clone())
            .unwrap_or_default()
    }

    /// Values stored at `offset`, oldest first.
    pub fn writes_to(&self, offset: usize) -> Vec<u32> {
        self.writes()
            .into_iter()
            .filter(|w| w.offset == offset)
            .map(|w| w.value)
            .collect()
    }

    /// Forget the recorded stores, keeping register contents.
    pub fn clear_log(&self) {
        if let Some(log) = &self.log {
            log.lock().clear();
        }
    }

    fn apply(&self, offset: usize, width: AccessWidth, value: u32) {
        let (index, shift, mask) = Self::lane(offset, width);
        match width {
            AccessWidth::Word => self.words[index].store(value, Ordering::Release),
            _ => {
                let _ = self.words[index].fetch_update(Ordering::AcqRel, Ordering::Acquire, |w| {
                    Some((w & !mask) | (value << shift))
                });
            }
        }
    }

    fn lane(offset: usize, width: AccessWidth) -> (usize, u32, u32) {
        let shift = ((offset % 4) * 8) as u32;
        (offset / 4, shift, width.mask() << shift)
    }
}

impl RegisterBacking for SimulatedBacking {
    fn span(&self) -> usize {
        self.span
    }

    fn load(&self, offset: usize, width: AccessWidth) -> RegResult<u32> {
        let (index, shift, mask) = Self::lane(offset, width);
        let word = self.words[index].load(Ordering::Acquire);
        Ok((word & mask) >> shift)
    }

    fn store(&self, offset: usize, width: AccessWidth, value: u32) -> RegResult<()> {
        let value = value & width.mask();

        let Some(log) = &self.log else {
            self.apply(offset, width, value);
            return Ok(());
        };
        // Hold the log lock across the store so the log order matches the
        // order in which stores landed.
        let mut log = log.lock();
        self.apply(offset, width, value);
        log.push(WriteRecord {
            offset,
            width,
            value,
        });
        Ok(())
    }

    fn describe(&self) -> String {
        let log = if self.is_logging() { ", write log" } else { "" };
        format!("simulation ({:#x} bytes{})", self.span, log)
    }
}
