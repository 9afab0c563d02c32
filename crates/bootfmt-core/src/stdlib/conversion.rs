//! Numeric conversions: integer-to-text (for the printf engine) and
//! text-to-unsigned (strtoul/strtoull).
//!
//! Both directions avoid the native `/` and `%` on 64-bit operands and go
//! through [`divmod64`] instead.

use crate::error::BootError;
use crate::math::divmod64;
use crate::string::word::is_space;

// ----------------------------------------------------------------------------
// Integer formatting
// ----------------------------------------------------------------------------

/// How an integer payload is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntStyle {
    /// Signed decimal with a leading `-` for negative values.
    Signed,
    /// Unsigned decimal.
    Unsigned,
    /// Unsigned hexadecimal, `0-9a-f`.
    LowerHex,
    /// Unsigned hexadecimal, `0-9A-F`.
    UpperHex,
}

/// Room for a sign and the 20 decimal digits of `u64::MAX`.
pub const INT_BUF_LEN: usize = 24;

/// Rendered digits of one integer, most significant first.
#[derive(Debug, Clone, Copy)]
pub struct IntDigits {
    buf: [u8; INT_BUF_LEN],
    len: usize,
}

impl IntDigits {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Render `value` according to `style`.
///
/// The payload is a 64-bit container; only [`IntStyle::Signed`] reads it as
/// signed. Negation happens in unsigned space so `i64::MIN` is exact.
#[must_use]
pub fn format_int(value: i64, style: IntStyle) -> IntDigits {
    let mut out = IntDigits {
        buf: [0; INT_BUF_LEN],
        len: 0,
    };

    let mut n = value as u64;
    if style == IntStyle::Signed && value < 0 {
        out.buf[0] = b'-';
        out.len = 1;
        n = n.wrapping_neg();
    }

    let start = out.len;
    match style {
        IntStyle::LowerHex | IntStyle::UpperHex => {
            let alpha = if style == IntStyle::UpperHex { b'A' } else { b'a' };
            loop {
                let d = (n & 0xf) as u8;
                out.buf[out.len] = if d > 9 { alpha + d - 10 } else { b'0' + d };
                out.len += 1;
                n >>= 4;
                if n == 0 {
                    break;
                }
            }
        }
        IntStyle::Signed | IntStyle::Unsigned => loop {
            let (q, r) = divmod64(n, 10);
            out.buf[out.len] = b'0' + r as u8;
            out.len += 1;
            n = q;
            if n == 0 {
                break;
            }
        },
    }

    out.buf[start..out.len].reverse();
    out
}

// ----------------------------------------------------------------------------
// Text to unsigned
// ----------------------------------------------------------------------------

/// Result of a string-to-number conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStatus {
    Success,
    Overflow,
    BadNumber,
}

impl ConversionStatus {
    /// Map to the engine's error kinds.
    pub fn into_result(self) -> Result<(), BootError> {
        match self {
            Self::Success => Ok(()),
            Self::Overflow => Err(BootError::OutOfRange),
            Self::BadNumber => Err(BootError::BadNumber),
        }
    }
}

/// Parse an unsigned 64-bit number: returns `(value, consumed_bytes, status)`.
///
/// Leading whitespace is skipped. `base == 0` picks 16 for a `0x` prefix,
/// 8 for a `0` followed by an octal digit and 10 otherwise; `base == 16`
/// also accepts a `0x` prefix. On overflow the value saturates to
/// `u64::MAX`; with no digits it is `0` and nothing is consumed.
pub fn strtoull_impl(s: &[u8], base: u32) -> (u64, usize, ConversionStatus) {
    let len = s.len();
    let mut i = 0;

    while i < len && is_space(s[i]) {
        i += 1;
    }

    let mut base = u64::from(base);
    if i < len && s[i] == b'0' {
        let next = s.get(i + 1).copied();
        if next == Some(b'x') {
            if base == 0 || base == 16 {
                base = 16;
                i += 2;
            }
        } else if base == 0 && matches!(next, Some(b'0'..=b'7')) {
            base = 8;
        }
    }
    if base == 0 {
        base = 10;
    }
    if base > 36 {
        return (0, 0, ConversionStatus::BadNumber);
    }

    let mut num = 0u64;
    let mut found = false;

    while i < len {
        let digit = match s[i].to_ascii_lowercase() {
            c @ b'0'..=b'9' => u64::from(c - b'0'),
            c @ b'a'..=b'z' => u64::from(c - b'a') + 10,
            _ => break,
        };
        if digit >= base {
            break;
        }
        found = true;

        // num * base + digit > u64::MAX
        if num > divmod64(u64::MAX - digit, base).0 {
            return (u64::MAX, i, ConversionStatus::Overflow);
        }
        num = num * base + digit;
        i += 1;
    }

    if !found {
        return (0, 0, ConversionStatus::BadNumber);
    }
    (num, i, ConversionStatus::Success)
}

/// [`strtoull_impl`] narrowed to the target's pointer width.
pub fn strtoul_impl(s: &[u8], base: u32) -> (usize, usize, ConversionStatus) {
    let (num, consumed, status) = strtoull_impl(s, base);
    match usize::try_from(num) {
        Ok(v) => (v, consumed, status),
        Err(_) => (usize::MAX, consumed, ConversionStatus::Overflow),
    }
}

pub fn strtoull(s: &[u8], base: u32) -> (u64, usize) {
    let (val, len, _) = strtoull_impl(s, base);
    (val, len)
}

pub fn strtoul(s: &[u8], base: u32) -> (usize, usize) {
    let (val, len, _) = strtoul_impl(s, base);
    (val, len)
}

/// Parse a run of ASCII decimal digits, saturating instead of overflowing.
pub(crate) fn parse_decimal(digits: &[u8]) -> u64 {
    let mut result = 0_u64;
    for &d in digits {
        result = result
            .saturating_mul(10)
            .saturating_add(u64::from(d - b'0'));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(value: i64, style: IntStyle) -> String {
        String::from_utf8(format_int(value, style).as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(render(0, IntStyle::Signed), "0");
        assert_eq!(render(42, IntStyle::Signed), "42");
        assert_eq!(render(-123, IntStyle::Signed), "-123");
        assert_eq!(render(i64::MIN, IntStyle::Signed), "-9223372036854775808");
        assert_eq!(render(i64::MAX, IntStyle::Signed), "9223372036854775807");
    }

    #[test]
    fn test_format_unsigned_reads_container_bits() {
        assert_eq!(render(-1, IntStyle::Unsigned), "18446744073709551615");
        assert_eq!(render(4_294_967_295, IntStyle::Unsigned), "4294967295");
    }

    #[test]
    fn test_format_hex() {
        assert_eq!(render(0, IntStyle::LowerHex), "0");
        assert_eq!(render(255, IntStyle::LowerHex), "ff");
        assert_eq!(render(0xDEAD_BEEF, IntStyle::UpperHex), "DEADBEEF");
        assert_eq!(render(-1, IntStyle::LowerHex), "ffffffffffffffff");
    }

    #[test]
    fn test_parse_decimal_saturates() {
        assert_eq!(parse_decimal(b"1234"), 1234);
        assert_eq!(parse_decimal(b"99999999999999999999999"), u64::MAX);
    }

    #[test]
    fn test_strtoull_base10() {
        assert_eq!(strtoull_impl(b"123456", 10), (123_456, 6, ConversionStatus::Success));
        assert_eq!(strtoull_impl(b"  42abc", 10), (42, 4, ConversionStatus::Success));
    }

    #[test]
    fn test_strtoull_auto_base() {
        assert_eq!(strtoull(b"0x10", 0), (16, 4));
        assert_eq!(strtoull(b"010", 0), (8, 3));
        assert_eq!(strtoull(b"10", 0), (10, 2));
        assert_eq!(strtoull(b"0", 0), (0, 1));
    }

    #[test]
    fn test_strtoull_hex_prefix_and_case() {
        assert_eq!(strtoull(b"0xFf", 16), (255, 4));
        assert_eq!(strtoull(b"fF", 16), (255, 2));
        // base 10 leaves the prefix alone
        assert_eq!(strtoull(b"0x5", 10), (0, 1));
    }

    #[test]
    fn test_strtoull_overflow() {
        let s = u64::MAX.to_string();
        assert_eq!(
            strtoull_impl(s.as_bytes(), 10),
            (u64::MAX, s.len(), ConversionStatus::Success)
        );

        let (val, _, status) = strtoull_impl(b"18446744073709551616", 10); // MAX + 1
        assert_eq!(val, u64::MAX);
        assert_eq!(status, ConversionStatus::Overflow);
        assert_eq!(status.into_result(), Err(BootError::OutOfRange));
    }

    #[test]
    fn test_strtoull_bad_number() {
        let (val, consumed, status) = strtoull_impl(b"xyz", 10);
        assert_eq!((val, consumed), (0, 0));
        assert_eq!(status.into_result(), Err(BootError::BadNumber));
        assert_eq!(strtoull_impl(b"", 10).2, ConversionStatus::BadNumber);
        assert_eq!(strtoull_impl(b" \t\n", 10).2, ConversionStatus::BadNumber);
    }

    #[test]
    fn test_strtoul_matches_pointer_width() {
        let (val, _, status) = strtoul_impl(b"4096", 10);
        assert_eq!(val, 4096);
        assert_eq!(status, ConversionStatus::Success);
        assert_eq!(strtoul(b"7", 10), (7, 1));
    }
}
