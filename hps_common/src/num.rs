//! Integer literals with C-style base prefixes.
//!
//! Command-line values and register stores accept `0x`/`0X` hexadecimal,
//! `0b`/`0B` binary, leading-zero octal and plain decimal.

/// Parse an unsigned integer literal, honouring its base prefix.
///
/// Surrounding whitespace and a single leading `+` are accepted. Returns
/// `None` for empty input, stray characters or values wider than `u64`.
pub fn parse_int(text: &str) -> Option<u64> {
    let text = text.trim();
    let text = text.strip_prefix('+').unwrap_or(text);

    let (digits, radix) = if let Some(hex) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        (hex, 16)
    } else if let Some(bin) = text
        .strip_prefix("0b")
        .or_else(|| text.strip_prefix("0B"))
    {
        (bin, 2)
    } else if text.len() > 1 && text.starts_with('0') {
        (&text[1..], 8)
    } else {
        (text, 10)
    };

    // from_str_radix would otherwise accept a second sign.
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u64::from_str_radix(digits, radix).ok()
}

/// Parse an integer literal that must fit in `T`.
pub fn parse_int_as<T: TryFrom<u64>>(text: &str) -> Option<T> {
    parse_int(text).and_then(|v| T::try_from(v).ok())
}
