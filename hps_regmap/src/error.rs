//! Error types for register window operations

use hps::register::{AccessWidth, Register};
use thiserror::Error;

/// Errors that can occur while accessing the register window
#[derive(Error, Debug)]
pub enum RegError {
    /// Offset lies at or beyond the end of the window
    #[error("Offset {offset:#x} out of range (span {span:#x})")]
    OutOfRange {
        /// Requested byte offset
        offset: usize,
        /// Window span in bytes
        span: usize,
    },

    /// Offset is not a multiple of the access width
    #[error("Unaligned access: offset {offset:#x} not aligned to {width} bytes")]
    Unaligned {
        /// Requested byte offset
        offset: usize,
        /// Access width in bytes
        width: usize,
    },

    /// Backing cannot perform accesses of this width
    #[error("Access width '{width}' not supported by this transport")]
    UnsupportedWidth {
        /// Rejected width
        width: AccessWidth,
    },

    /// The memory window could not be established
    #[error("Failed to map register window at {base:#x}: {source}")]
    MappingFailure {
        /// Physical base address
        base: u64,
        /// Underlying OS error
        source: std::io::Error,
    },

    /// Text written to a register attribute could not be parsed
    #[error("Invalid value for {register}: {input:?}")]
    InvalidValue {
        /// Target register
        register: Register,
        /// Rejected input
        input: String,
    },

    /// IO error
    #[error("IO error: {source}")]
    Io {
        /// Source IO error
        #[from]
        source: std::io::Error,
    },
}

/// Result type for register window operations
pub type RegResult<T> = Result<T, RegError>;

impl From<RegError> for std::io::Error {
    fn from(err: RegError) -> Self {
        use std::io::ErrorKind;

        match err {
            RegError::Io { source } => source,
            RegError::MappingFailure { source, .. } => source,
            RegError::OutOfRange { .. } | RegError::Unaligned { .. } => {
                std::io::Error::new(ErrorKind::InvalidInput, err)
            }
            RegError::UnsupportedWidth { .. } => std::io::Error::new(ErrorKind::Unsupported, err),
            RegError::InvalidValue { .. } => std::io::Error::new(ErrorKind::InvalidData, err),
        }
    }
}
