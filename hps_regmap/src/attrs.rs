//! Text attributes for the three registers
//!
//! Human-readable show/store pairs, one per register:
//!
//! | Attribute | show | store accepts |
//! |-----------|------|---------------|
//! | control   | `0` / `1` | `1 y yes on true` / `0 n no off false` |
//! | pattern   | `0x%X` | 8-bit integer, `0x`/`0b`/octal/decimal |
//! | rate      | `<int>.<4 digits>\t0x%X` | decimal string, UQ4.4 encoded |
//!
//! Stores go through the [`AccessGuard`]; shows are lock-free reads.

use crate::error::{RegError, RegResult};
use crate::guard::AccessGuard;
use hps::fixed::{Uq44, encode};
use hps::num::parse_int_as;
use hps::register::{ControlFlags, Register};
use tracing::debug;

/// Render a raw register value the way its attribute shows it.
pub fn render(register: Register, raw: u32) -> String {
    match register {
        Register::Control => {
            let enabled = ControlFlags::from_bits_truncate(raw).contains(ControlFlags::OVERRIDE);
            u8::from(enabled).to_string()
        }
        Register::Pattern => format!("0x{:X}", raw as u8),
        Register::Rate => {
            let rate = Uq44::from_raw(raw as u8);
            format!("{}\t0x{:X}", rate, rate.raw())
        }
    }
}

/// Read and render one register.
pub fn show(guard: &AccessGuard, register: Register) -> RegResult<String> {
    let raw = guard.read_register(register)?;
    Ok(render(register, raw))
}

/// Parse attribute text into the raw value to store.
///
/// # Errors
/// `InvalidValue` for Control and Pattern input that does not parse. Rate
/// input never fails; see [`hps::fixed::encode`].
pub fn parse(register: Register, input: &str) -> RegResult<u32> {
    let invalid = || RegError::InvalidValue {
        register,
        input: input.to_string(),
    };
    match register {
        Register::Control => parse_bool(input)
            .map(|on| {
                if on {
                    ControlFlags::OVERRIDE.bits()
                } else {
                    ControlFlags::empty().bits()
                }
            })
            .ok_or_else(invalid),
        Register::Pattern => parse_int_as::<u8>(input)
            .map(u32::from)
            .ok_or_else(invalid),
        Register::Rate => Ok(u32::from(encode(input))),
    }
}

/// Parse and store one register.
pub fn store(guard: &AccessGuard, register: Register, input: &str) -> RegResult<()> {
    let raw = parse(register, input)?;
    debug!("store {} <- {:#x} ({:?})", register, raw, input.trim());
    guard.write_register(register, raw)
}

/// Parse a boolean word.
pub fn parse_bool(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "1" | "y" | "yes" | "on" | "true" => Some(true),
        "0" | "n" | "no" | "off" | "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::RegisterWindow;

    fn guard() -> AccessGuard {
        let (window, _sim) = RegisterWindow::simulated();
        AccessGuard::new(window)
    }

    #[test]
    fn test_render() {
        assert_eq!(render(Register::Control, 0), "0");
        assert_eq!(render(Register::Control, 1), "1");
        assert_eq!(render(Register::Control, 0xFFFF_FFFE), "0");
        assert_eq!(render(Register::Pattern, 0xAA), "0xAA");
        assert_eq!(render(Register::Pattern, 0x3), "0x3");
        assert_eq!(render(Register::Rate, 0x57), "5.4375\t0x57");
        assert_eq!(render(Register::Rate, 0x10), "1.0000\t0x10");
    }

    #[test]
    fn test_parse_bool() {
        for word in ["1", "y", "Yes", "ON", "true\n"] {
            assert_eq!(parse_bool(word), Some(true), "{word}");
        }
        for word in ["0", "N", "no", "off", "False"] {
            assert_eq!(parse_bool(word), Some(false), "{word}");
        }
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn test_store_and_show() {
        let guard = guard();

        store(&guard, Register::Control, "1\n").unwrap();
        store(&guard, Register::Pattern, "0xF0").unwrap();
        store(&guard, Register::Rate, "2.5").unwrap();

        assert_eq!(show(&guard, Register::Control).unwrap(), "1");
        assert_eq!(show(&guard, Register::Pattern).unwrap(), "0xF0");
        assert_eq!(show(&guard, Register::Rate).unwrap(), "2.5000\t0x28");
    }

    #[test]
    fn test_invalid_store_leaves_register_untouched() {
        let guard = guard();
        store(&guard, Register::Pattern, "0x12").unwrap();

        assert!(matches!(
            store(&guard, Register::Pattern, "0x100"),
            Err(RegError::InvalidValue {
                register: Register::Pattern,
                ..
            })
        ));
        assert!(store(&guard, Register::Control, "enable").is_err());
        assert_eq!(guard.read_register(Register::Pattern).unwrap(), 0x12);
    }

    #[test]
    fn test_rate_store_saturates() {
        let guard = guard();
        store(&guard, Register::Rate, "42").unwrap();
        assert_eq!(guard.read_register(Register::Rate).unwrap(), 0xFF);
    }
}
