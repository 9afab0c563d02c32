//! Single-codepoint UTF-8 encoder for the `%C` conversion.

/// Encoded form of one codepoint: 1 to 4 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Utf8Seq {
    bytes: [u8; 4],
    len: usize,
}

impl Utf8Seq {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
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

/// Encode `code` as UTF-8.
///
/// Anything above U+10FFFF becomes `?`. Surrogate values are encoded
/// as-is; the caller hands us a raw scalar from the argument list and no
/// validation is applied beyond the range buckets.
#[must_use]
pub fn encode_utf8(code: u32) -> Utf8Seq {
    let (code, shift, lead) = match code {
        0..=0x7f => (code, 0, 0x00),
        0x80..=0x7ff => (code, 6, 0xc0),
        0x800..=0xffff => (code, 12, 0xe0),
        0x1_0000..=0x10_ffff => (code, 18, 0xf0),
        _ => (u32::from(b'?'), 0, 0x00),
    };

    let mut seq = Utf8Seq {
        bytes: [0; 4],
        len: 0,
    };
    seq.bytes[0] = (lead | (code >> shift)) as u8;
    seq.len = 1;

    let mut shift = shift;
    while shift >= 6 {
        shift -= 6;
        seq.bytes[seq.len] = 0x80 | ((code >> shift) & 0x3f) as u8;
        seq.len += 1;
    }
    seq
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii() {
        assert_eq!(encode_utf8(u32::from(b'A')).as_bytes(), b"A");
        assert_eq!(encode_utf8(0).as_bytes(), &[0]);
    }

    #[test]
    fn test_agrees_with_char_encoding() {
        for c in ['\u{7f}', '\u{80}', 'é', '\u{7ff}', '\u{800}', '€', '\u{ffff}', '😀', '\u{10ffff}'] {
            let mut expect = [0u8; 4];
            let expect = c.encode_utf8(&mut expect).as_bytes();
            assert_eq!(encode_utf8(c as u32).as_bytes(), expect, "U+{:04X}", c as u32);
        }
    }

    #[test]
    fn test_out_of_range_is_question_mark() {
        assert_eq!(encode_utf8(0x11_0000).as_bytes(), b"?");
        assert_eq!(encode_utf8(u32::MAX).as_bytes(), b"?");
    }

    #[test]
    fn test_surrogate_passes_through() {
        assert_eq!(encode_utf8(0xd800).as_bytes(), &[0xed, 0xa0, 0x80]);
    }
}
