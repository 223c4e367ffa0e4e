//! Linux-specific register window transports

use crate::backing::RegisterBacking;
use crate::error::{RegError, RegResult};
use hps::register::AccessWidth;
use memmap2::{MmapMut, MmapOptions};
use nix::unistd::geteuid;
use std::fs::{File, OpenOptions};
use std::os::unix::fs::{FileExt, OpenOptionsExt};
use std::path::{Path, PathBuf};
use std::ptr::NonNull;
use tracing::{debug, info, warn};

/// System page size, falling back to 4 KiB if the query fails.
pub fn page_size() -> usize {
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size > 0 { size as usize } else { 4096 }
}

/// Register window mapped out of the physical memory device.
///
/// The page containing `base` is mapped shared and uncached (`O_SYNC`); all
/// accesses are volatile so that every load and store reaches the bus.
pub struct DevMemBacking {
    /// Keeps the mapping alive; unmapped on drop.
    _map: MmapMut,
    /// First register byte inside the mapping.
    regs: NonNull<u8>,
    base: u64,
    span: usize,
}

// Safety: the raw pointer refers into `_map`, which lives as long as `self`.
// Accesses are naturally aligned volatile loads/stores of at most 32 bits, which
// the bus performs as single transactions; writers are serialized above this
// layer by the access guard.
unsafe impl Send for DevMemBacking {}
unsafe impl Sync for DevMemBacking {}

impl DevMemBacking {
    /// Map `span` bytes at physical address `base` through `path`.
    ///
    /// # Errors
    /// Returns `RegError::MappingFailure` if the device cannot be opened or
    /// mapped. Nothing stays mapped on failure.
    pub fn open(path: &Path, base: u64, span: usize) -> RegResult<Self> {
        let page_mask = page_size() as u64 - 1;
        let page_base = base & !page_mask;
        let page_offset = (base - page_base) as usize;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_SYNC)
            .open(path)
            .map_err(|source| {
                if source.kind() == std::io::ErrorKind::PermissionDenied && !geteuid().is_root() {
                    warn!("{} usually requires root", path.display());
                }
                RegError::MappingFailure { base, source }
            })?;

        let mut map = unsafe {
            MmapOptions::new()
                .offset(page_base)
                .len(page_offset + span)
                .map_mut(&file)
        }
        .map_err(|source| RegError::MappingFailure { base, source })?;

        let regs = NonNull::new(unsafe { map.as_mut_ptr().add(page_offset) }).ok_or_else(|| {
            RegError::MappingFailure {
                base,
                source: std::io::Error::other("mapping returned a null pointer"),
            }
        })?;

        info!(
            "Mapped {:#x} bytes at {:#x} from {} (page {:#x} + {:#x})",
            span,
            base,
            path.display(),
            page_base,
            page_offset
        );

        Ok(Self {
            _map: map,
            regs,
            base,
            span,
        })
    }

    /// Physical base address.
    pub fn base(&self) -> u64 {
        self.base
    }
}

impl RegisterBacking for DevMemBacking {
    fn span(&self) -> usize {
        self.span
    }

    fn load(&self, offset: usize, width: AccessWidth) -> RegResult<u32> {
        // Safety: the window checked offset + width <= span and alignment.
        let value = unsafe {
            let ptr = self.regs.as_ptr().add(offset);
            match width {
                AccessWidth::Byte => u32::from(ptr.read_volatile()),
                AccessWidth::Half => u32::from(ptr.cast::<u16>().read_volatile()),
                AccessWidth::Word => ptr.cast::<u32>().read_volatile(),
            }
        };
        Ok(value)
    }

    fn store(&self, offset: usize, width: AccessWidth, value: u32) -> RegResult<()> {
        // Safety: as for `load`.
        unsafe {
            let ptr = self.regs.as_ptr().add(offset);
            match width {
                AccessWidth::Byte => ptr.write_volatile(value as u8),
                AccessWidth::Half => ptr.cast::<u16>().write_volatile(value as u16),
                AccessWidth::Word => ptr.cast::<u32>().write_volatile(value),
            }
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("devmem {:#x}+{:#x}", self.base, self.span)
    }
}

impl Drop for DevMemBacking {
    fn drop(&mut self) {
        debug!("Unmapping register window at {:#x}", self.base);
    }
}

/// Register window reached through the platform driver's character device.
///
/// The driver only accepts 4-byte transfers at word-aligned file positions,
/// so this backing supports `AccessWidth::Word` alone.
pub struct CharDeviceBacking {
    file: File,
    path: PathBuf,
    span: usize,
}

impl CharDeviceBacking {
    /// Open the device node at `path`.
    ///
    /// # Errors
    /// Returns `RegError::MappingFailure` if the node cannot be opened.
    pub fn open(path: &Path, span: usize) -> RegResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| RegError::MappingFailure { base: 0, source })?;

        info!("Opened register device {} ({:#x} bytes)", path.display(), span);

        Ok(Self {
            file,
            path: path.to_path_buf(),
            span,
        })
    }
}

impl RegisterBacking for CharDeviceBacking {
    fn span(&self) -> usize {
        self.span
    }

    fn supports(&self, width: AccessWidth) -> bool {
        width == AccessWidth::Word
    }

    fn load(&self, offset: usize, _width: AccessWidth) -> RegResult<u32> {
        let mut buf = [0u8; 4];
        self.file.read_exact_at(&mut buf, offset as u64)?;
        Ok(u32::from_ne_bytes(buf))
    }

    fn store(&self, offset: usize, _width: AccessWidth, value: u32) -> RegResult<()> {
        self.file.write_all_at(&value.to_ne_bytes(), offset as u64)?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("chardev {}", self.path.display())
    }
}
