//! Byte classification and whole-word search over separator-delimited lists.

/// Whitespace as the firmware shell understands it.
#[inline]
#[must_use]
pub const fn is_space(c: u8) -> bool {
    matches!(c, b'\n' | b'\r' | b' ' | b'\t')
}

/// Separators between words in list-valued settings such as `debug`.
#[inline]
#[must_use]
pub const fn is_word_separator(c: u8) -> bool {
    is_space(c) || matches!(c, b',' | b';' | b'|' | b'&')
}

/// Iterate the non-empty words of `s`.
pub fn words(s: &[u8]) -> impl Iterator<Item = &[u8]> {
    s.split(|&c| is_word_separator(c)).filter(|w| !w.is_empty())
}

/// True if `needle` appears as a whole word in `haystack`.
///
/// `needle` is compared up to its own first separator; an empty needle
/// never matches.
#[must_use]
pub fn strword(haystack: &[u8], needle: &[u8]) -> bool {
    let end = needle
        .iter()
        .position(|&c| is_word_separator(c))
        .unwrap_or(needle.len());
    let needle = &needle[..end];
    if needle.is_empty() {
        return false;
    }
    words(haystack).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_space() {
        assert!(is_space(b' '));
        assert!(is_space(b'\t'));
        assert!(!is_space(b'\x0b'));
        assert!(!is_space(b'a'));
    }

    #[test]
    fn test_strword_whole_words_only() {
        assert!(strword(b"disk,net mm", b"net"));
        assert!(strword(b"  mm", b"mm"));
        assert!(!strword(b"network", b"net"));
        assert!(!strword(b"netx,disk", b"net"));
    }

    #[test]
    fn test_strword_all_separators() {
        let list = b"a;b|c&d\te\nf\rg";
        for w in [b"a", b"b", b"c", b"d", b"e", b"f", b"g"] {
            assert!(strword(list, w));
        }
    }

    #[test]
    fn test_strword_needle_stops_at_separator() {
        assert!(strword(b"disk", b"disk extra"));
        assert!(!strword(b"disk", b""));
        assert!(!strword(b"", b"disk"));
    }
}
