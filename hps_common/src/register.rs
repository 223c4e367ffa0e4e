//! Register addressing conventions for the LED pattern component.
//!
//! The component exposes three 32-bit slots followed by one reserved slot:
//!
//! | Offset | Register | Semantics |
//! |--------|----------|-----------|
//! | `0x0`  | Control  | bit0 = software override |
//! | `0x4`  | Pattern  | low 8 bits = displayed pattern |
//! | `0x8`  | Rate     | low 8 bits = UQ4.4 base rate |
//! | `0xC`  | reserved | no defined effect |

use crate::consts::{CONTROL_OFFSET, PATTERN_OFFSET, RATE_OFFSET};
use bitflags::bitflags;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

bitflags! {
    /// Bits of the Control register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ControlFlags: u32 {
        /// Software drives the pattern register instead of the fabric logic.
        const OVERRIDE = 1 << 0;
    }
}

/// A named register of the component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    /// Override/enable register.
    Control,
    /// Displayed LED pattern.
    Pattern,
    /// UQ4.4 base rate.
    Rate,
}

impl Register {
    /// All registers in address order.
    pub const ALL: [Register; 3] = [Register::Control, Register::Pattern, Register::Rate];

    /// Byte offset of the register inside the window.
    pub const fn offset(self) -> usize {
        match self {
            Register::Control => CONTROL_OFFSET,
            Register::Pattern => PATTERN_OFFSET,
            Register::Rate => RATE_OFFSET,
        }
    }

    /// Attribute name used by the query surface.
    pub const fn name(self) -> &'static str {
        match self {
            Register::Control => "control",
            Register::Pattern => "pattern",
            Register::Rate => "rate",
        }
    }

    /// Look up the register living at `offset`, if any.
    pub fn from_offset(offset: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.offset() == offset)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a register or width name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {input:?}")]
pub struct ParseNameError {
    kind: &'static str,
    input: String,
}

impl FromStr for Register {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "control" | "hps_led_control" => Ok(Register::Control),
            "pattern" | "led_reg" => Ok(Register::Pattern),
            "rate" | "base_rate" => Ok(Register::Rate),
            _ => Err(ParseNameError {
                kind: "register",
                input: s.to_string(),
            }),
        }
    }
}

/// Width of a single register access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccessWidth {
    /// 8-bit access.
    Byte,
    /// 16-bit access.
    Half,
    /// 32-bit access.
    #[default]
    Word,
}

impl AccessWidth {
    /// Number of bytes moved by one access.
    pub const fn bytes(self) -> usize {
        match self {
            AccessWidth::Byte => 1,
            AccessWidth::Half => 2,
            AccessWidth::Word => 4,
        }
    }

    /// Mask selecting the bits an access of this width can carry.
    pub const fn mask(self) -> u32 {
        match self {
            AccessWidth::Byte => 0xFF,
            AccessWidth::Half => 0xFFFF,
            AccessWidth::Word => u32::MAX,
        }
    }
}

impl fmt::Display for AccessWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            AccessWidth::Byte => 'b',
            AccessWidth::Half => 'h',
            AccessWidth::Word => 'w',
        };
        write!(f, "{c}")
    }
}

impl FromStr for AccessWidth {
    type Err = ParseNameError;

    /// Accepts the devmem spellings: `b`yte, `h`alfword, `w`ord.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('b') => Ok(AccessWidth::Byte),
            Some('h') => Ok(AccessWidth::Half),
            Some('w') => Ok(AccessWidth::Word),
            _ => Err(ParseNameError {
                kind: "access width",
                input: s.to_string(),
            }),
        }
    }
}
