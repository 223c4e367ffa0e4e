//! Seekable byte-stream view of the register window
//!
//! [`RegisterStream`] gives the window the semantics of the platform driver's
//! device node: a file position, one 32-bit register per transfer, end of
//! file at the window span. It implements `Read`, `Write` and `Seek`, so
//! generic I/O code can drive the registers.

use crate::error::RegError;
use crate::guard::AccessGuard;
use hps::consts::REGISTER_WIDTH;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::sync::Arc;

/// Register window with a file position.
#[derive(Debug)]
pub struct RegisterStream {
    guard: Arc<AccessGuard>,
    pos: u64,
}

impl RegisterStream {
    /// Open a stream positioned at offset 0.
    pub fn new(guard: Arc<AccessGuard>) -> Self {
        Self { guard, pos: 0 }
    }

    /// Current file position.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Resolve the position for a transfer, `None` at end of device.
    fn transfer_offset(&self, len: usize) -> io::Result<Option<usize>> {
        let span = self.guard.span() as u64;
        if len == 0 || self.pos >= span {
            return Ok(None);
        }
        let offset = self.pos as usize;
        if offset % REGISTER_WIDTH != 0 {
            return Err(RegError::Unaligned {
                offset,
                width: REGISTER_WIDTH,
            }
            .into());
        }
        if len < REGISTER_WIDTH {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("transfers move {REGISTER_WIDTH} bytes, got a {len}-byte buffer"),
            ));
        }
        Ok(Some(offset))
    }
}

impl Read for RegisterStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some(offset) = self.transfer_offset(buf.len())? else {
            return Ok(0);
        };
        let value = self.guard.read32(offset)?;
        buf[..REGISTER_WIDTH].copy_from_slice(&value.to_ne_bytes());
        self.pos += REGISTER_WIDTH as u64;
        Ok(REGISTER_WIDTH)
    }
}

impl Write for RegisterStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let Some(offset) = self.transfer_offset(buf.len())? else {
            return Ok(0);
        };
        let mut word = [0u8; REGISTER_WIDTH];
        word.copy_from_slice(&buf[..REGISTER_WIDTH]);
        self.guard.write32(offset, u32::from_ne_bytes(word))?;
        self.pos += REGISTER_WIDTH as u64;
        Ok(REGISTER_WIDTH)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for RegisterStream {
    fn seek(&mut self, target: SeekFrom) -> io::Result<u64> {
        let next = match target {
            SeekFrom::Start(pos) => Some(pos),
            SeekFrom::Current(delta) => self.pos.checked_add_signed(delta),
            SeekFrom::End(delta) => (self.guard.span() as u64).checked_add_signed(delta),
        };
        let next = next.ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "seek to a negative position")
        })?;
        self.pos = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::RegisterWindow;

    fn stream() -> RegisterStream {
        let (window, _sim) = RegisterWindow::simulated();
        RegisterStream::new(Arc::new(AccessGuard::new(window)))
    }

    #[test]
    fn test_seek_modes() {
        let mut s = stream();
        assert_eq!(s.seek(SeekFrom::Start(8)).unwrap(), 8);
        assert_eq!(s.seek(SeekFrom::Current(-4)).unwrap(), 4);
        assert_eq!(s.seek(SeekFrom::End(-4)).unwrap(), 12);
        assert!(s.seek(SeekFrom::Current(-100)).is_err());
        assert_eq!(s.position(), 12);
    }

    #[test]
    fn test_zero_length_transfer() {
        let mut s = stream();
        assert_eq!(s.read(&mut []).unwrap(), 0);
        assert_eq!(s.write(&[]).unwrap(), 0);
        assert_eq!(s.position(), 0);
    }

    #[test]
    fn test_short_buffer_rejected() {
        let mut s = stream();
        let err = s.write(&[1, 2]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
