//! Command-line argument slots: `<tag>:<value>`.
//!
//! | Tag | Slot |
//! |---|---|
//! | `i` | signed integer |
//! | `u` | unsigned integer |
//! | `s` | byte string; `s:(null)` is a null string |
//! | `c` | a single character, or a number for its code point |
//! | `p` | pointer-sized address |
//!
//! Numbers accept decimal, `0x` hex and leading-`0` octal.

use std::str::FromStr;

use bootfmt_core::BootError;
use bootfmt_core::stdio::Arg;
use bootfmt_core::stdlib::{ConversionStatus, strtoul_impl, strtoull_impl};
use thiserror::Error;

/// Value spelling that stands for a null string.
pub const NULL_STRING: &str = "(null)";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgSpecError {
    #[error("argument '{0}' has no '<tag>:' prefix")]
    MissingTag(String),
    #[error("unknown argument tag '{0}' (expected one of i, u, s, c, p)")]
    UnknownTag(String),
    #[error("argument '{spec}': {source}")]
    Number {
        spec: String,
        #[source]
        source: BootError,
    },
    #[error("argument '{0}': trailing characters after the number")]
    Trailing(String),
}

/// An owned argument slot parsed from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgSpec {
    Int(i64),
    Uint(u64),
    Char(u32),
    Str(Option<Vec<u8>>),
    Ptr(usize),
}

impl ArgSpec {
    /// Borrow as an engine argument slot.
    #[must_use]
    pub fn as_arg(&self) -> Arg<'_> {
        match self {
            Self::Int(v) => Arg::Int(*v),
            Self::Uint(v) => Arg::Uint(*v),
            Self::Char(c) => Arg::Char(*c),
            Self::Str(s) => Arg::Str(s.as_deref()),
            Self::Ptr(p) => Arg::Ptr(*p),
        }
    }
}

/// Accept a parse only if it succeeded and consumed all of `text`.
fn whole<T>(
    spec: &str,
    text: &str,
    parsed: (T, usize, ConversionStatus),
) -> Result<T, ArgSpecError> {
    let (value, consumed, status) = parsed;
    status.into_result().map_err(|source| ArgSpecError::Number {
        spec: spec.to_string(),
        source,
    })?;
    if consumed != text.len() {
        return Err(ArgSpecError::Trailing(spec.to_string()));
    }
    Ok(value)
}

fn parse_signed(spec: &str, text: &str) -> Result<i64, ArgSpecError> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let magnitude = whole(spec, digits, strtoull_impl(digits.as_bytes(), 0))?;
    let out_of_range = || ArgSpecError::Number {
        spec: spec.to_string(),
        source: BootError::OutOfRange,
    };
    if negative {
        0i64.checked_sub_unsigned(magnitude).ok_or_else(out_of_range)
    } else {
        i64::try_from(magnitude).map_err(|_| out_of_range())
    }
}

impl FromStr for ArgSpec {
    type Err = ArgSpecError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let Some((tag, value)) = spec.split_once(':') else {
            return Err(ArgSpecError::MissingTag(spec.to_string()));
        };

        match tag {
            "i" => parse_signed(spec, value).map(Self::Int),
            "u" => whole(spec, value, strtoull_impl(value.as_bytes(), 0)).map(Self::Uint),
            "p" => whole(spec, value, strtoul_impl(value.as_bytes(), 0)).map(Self::Ptr),
            "s" if value == NULL_STRING => Ok(Self::Str(None)),
            "s" => Ok(Self::Str(Some(value.as_bytes().to_vec()))),
            "c" => {
                let mut chars = value.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Self::Char(u32::from(c))),
                    _ => {
                        let code = whole(spec, value, strtoull_impl(value.as_bytes(), 0))?;
                        u32::try_from(code).map(Self::Char).map_err(|_| ArgSpecError::Number {
                            spec: spec.to_string(),
                            source: BootError::OutOfRange,
                        })
                    }
                }
            }
            other => Err(ArgSpecError::UnknownTag(other.to_string())),
        }
    }
}
