//! Two-column hex fields for the live panel.
//!
//! Values that fit a byte are shown exactly. Anything up to `0xfff` keeps
//! only its top nibble behind a `+`, and larger values saturate to `++`, so
//! the column never grows past two cells.

use std::fmt;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Largest value displayed exactly.
pub const EXACT_LIMIT: u32 = 0xff;
/// Largest value displayed as `+<nibble>` before saturating.
pub const COARSE_LIMIT: u32 = 0xfff;

/// Fixed-width display token produced by [`encode_bounded_hex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexField([u8; 2]);

impl HexField {
    pub const SATURATED: HexField = HexField([b'+', b'+']);

    pub fn as_str(&self) -> &str {
        // Both bytes always come from HEX_DIGITS or `+`.
        std::str::from_utf8(&self.0).unwrap_or("++")
    }
}

impl fmt::Display for HexField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Encodes `value` as a two-character token, degrading precision as the
/// magnitude grows.
///
/// The tiers are fixed: exact up to [`EXACT_LIMIT`], `+<nibble>` up to
/// [`COARSE_LIMIT`], `++` beyond.
pub fn encode_bounded_hex(value: u32) -> HexField {
    match value {
        0..=EXACT_LIMIT => HexField([
            HEX_DIGITS[(value >> 4) as usize],
            HEX_DIGITS[(value & 0xf) as usize],
        ]),
        0x100..=COARSE_LIMIT => HexField([b'+', HEX_DIGITS[(value >> 8) as usize]]),
        _ => HexField::SATURATED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries() {
        assert_eq!(encode_bounded_hex(0).as_str(), "00");
        assert_eq!(encode_bounded_hex(0x0a).as_str(), "0A");
        assert_eq!(encode_bounded_hex(0xff).as_str(), "FF");
        assert_eq!(encode_bounded_hex(0x100).as_str(), "+1");
        assert_eq!(encode_bounded_hex(0xfff).as_str(), "+F");
        assert_eq!(encode_bounded_hex(0x1000).as_str(), "++");
        assert_eq!(encode_bounded_hex(u32::MAX), HexField::SATURATED);
    }

    #[test]
    fn displays_with_padding() {
        assert_eq!(format!("[{:>4}]", encode_bounded_hex(0x3c)), "[  3C]");
    }
}
