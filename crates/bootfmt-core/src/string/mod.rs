//! Byte-string helpers used by the formatter and its wrappers.

pub mod utf8;
pub mod word;

pub use utf8::{Utf8Seq, encode_utf8};
pub use word::{is_space, is_word_separator, strword};
