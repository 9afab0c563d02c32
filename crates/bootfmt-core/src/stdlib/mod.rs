//! Numeric conversion helpers.

pub mod conversion;

pub use conversion::{
    ConversionStatus, IntDigits, IntStyle, format_int, strtoul, strtoul_impl, strtoull,
    strtoull_impl,
};
