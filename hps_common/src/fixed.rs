//! Unsigned 4.4 fixed-point codec for the base rate register.
//!
//! A UQ4.4 byte carries the integer part in its high nibble and the fraction,
//! in sixteenths, in its low nibble. The hardware has no encoding for an
//! invalid value, so conversion from text never fails: oversized integers
//! saturate to `0xFF` and fractional digits beyond the precision of the
//! accumulator are dropped.

use std::fmt;
use std::str::FromStr;

/// Number of fractional bits in the encoding.
pub const FRACTION_BITS: u32 = 4;

/// Largest integer part that fits in the high nibble.
pub const MAX_INTEGER: u32 = 0xF;

/// Decimal weight of one sixteenth, in ten-thousandths.
const SIXTEENTH_TEN_THOUSANDTHS: u16 = 625;

/// Encode a decimal string (`[digits]['.' digits]`) as a UQ4.4 byte.
///
/// Surrounding whitespace, including a trailing newline, is ignored. Parsing
/// stops at the first character that does not fit the grammar, so input
/// without leading digits encodes as zero. The binary fraction is truncated
/// to four bits, never rounded.
pub fn encode(text: &str) -> u8 {
    let mut bytes = text.trim().bytes().peekable();

    let mut ipart: u32 = 0;
    while let Some(&b) = bytes.peek() {
        if !b.is_ascii_digit() {
            break;
        }
        bytes.next();
        match ipart
            .checked_mul(10)
            .and_then(|v| v.checked_add(u32::from(b - b'0')))
        {
            Some(v) => ipart = v,
            None => return u8::MAX,
        }
    }

    // `one` ends up as 10^(fraction digits consumed).
    let mut fpart: u32 = 0;
    let mut one: u32 = 1;
    if bytes.next() == Some(b'.') {
        for b in bytes.take_while(u8::is_ascii_digit) {
            let next_fpart = fpart
                .checked_mul(10)
                .and_then(|v| v.checked_add(u32::from(b - b'0')));
            let next_one = one.checked_mul(10);
            match (next_fpart, next_one) {
                (Some(f), Some(o)) => {
                    fpart = f;
                    one = o;
                }
                _ => break,
            }
        }
    }

    let mut fraction: u32 = 0;
    for _ in 0..FRACTION_BITS {
        // fpart < one <= 10^9, so doubling stays inside u32.
        fpart <<= 1;
        fraction <<= 1;
        if fpart >= one {
            fraction |= 1;
            fpart -= one;
        }
    }

    if ipart > MAX_INTEGER {
        return u8::MAX;
    }
    ((ipart << FRACTION_BITS) | fraction) as u8
}

/// Split a UQ4.4 byte into its integer part and its fraction expressed in
/// ten-thousandths (`0x57` decodes to `(5, 4375)`).
pub const fn decode(raw: u8) -> (u8, u16) {
    let ipart = raw >> FRACTION_BITS;
    let fpart = (raw & 0x0F) as u16 * SIXTEENTH_TEN_THOUSANDTHS;
    (ipart, fpart)
}

/// A UQ4.4 value as stored in the rate register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Uq44(u8);

impl Uq44 {
    /// Largest representable value, `15.9375`.
    pub const MAX: Uq44 = Uq44(u8::MAX);

    /// Wrap a raw register byte.
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    /// Raw register byte.
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Integer part (high nibble).
    pub const fn integer(self) -> u8 {
        decode(self.0).0
    }

    /// Fraction in ten-thousandths.
    pub const fn fraction(self) -> u16 {
        decode(self.0).1
    }

    /// Value as a float, exact for every encoding.
    pub fn to_f64(self) -> f64 {
        f64::from(self.0) / 16.0
    }
}

impl From<u8> for Uq44 {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

impl FromStr for Uq44 {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(encode(s)))
    }
}

impl fmt::Display for Uq44 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (ipart, fpart) = decode(self.0);
        write!(f, "{ipart}.{fpart:04}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_reference_points() {
        assert_eq!(encode("0"), 0x00);
        assert_eq!(encode("1"), 0x10);
        assert_eq!(encode("0.5"), 0x08);
        assert_eq!(encode("5.4375"), 0x57);
        assert_eq!(encode("15.9375"), 0xFF);
    }

    #[test]
    fn test_encode_saturates_large_integers() {
        assert_eq!(encode("16"), 0xFF);
        assert_eq!(encode("255.5"), 0xFF);
        assert_eq!(encode("99999999999999999999"), 0xFF);
    }

    #[test]
    fn test_encode_truncates_fraction() {
        // 0.99 = 15.84 sixteenths, truncated to 15.
        assert_eq!(encode("0.99"), 0x0F);
        // 0.06 is just under one sixteenth.
        assert_eq!(encode("0.06"), 0x00);
        assert_eq!(encode("0.0625"), 0x01);
    }

    #[test]
    fn test_encode_stops_on_long_fractions() {
        // Digits beyond the accumulator width are ignored.
        assert_eq!(encode("2.50000000000000000000001"), 0x28);
        assert_eq!(encode("1.9999999999999"), 0x1F);
    }

    #[test]
    fn test_encode_tolerates_malformed_input() {
        assert_eq!(encode(""), 0x00);
        assert_eq!(encode("abc"), 0x00);
        assert_eq!(encode("."), 0x00);
        assert_eq!(encode(".5"), 0x08);
        assert_eq!(encode("3."), 0x30);
        assert_eq!(encode("3x.5"), 0x30);
        assert_eq!(encode("1.5\n"), 0x18);
        assert_eq!(encode("  2.25  "), 0x24);
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode(0x57), (5, 4375));
        assert_eq!(decode(0x00), (0, 0));
        assert_eq!(decode(0xFF), (15, 9375));
    }

    #[test]
    fn test_display() {
        assert_eq!(Uq44::from_raw(0x57).to_string(), "5.4375");
        assert_eq!(Uq44::from_raw(0x10).to_string(), "1.0000");
        assert_eq!(Uq44::from_raw(0x01).to_string(), "0.0625");
        assert_eq!(Uq44::MAX.to_string(), "15.9375");
    }

    #[test]
    fn test_display_then_encode_is_identity() {
        for raw in 0..=u8::MAX {
            let text = Uq44::from_raw(raw).to_string();
            assert_eq!(encode(&text), raw, "round trip of {text}");
        }
    }

    #[test]
    fn test_accessors() {
        let value: Uq44 = "2.75".parse().unwrap();
        assert_eq!(value.raw(), 0x2C);
        assert_eq!(value.integer(), 2);
        assert_eq!(value.fraction(), 7500);
        assert_eq!(value.to_f64(), 2.75);
    }
}
