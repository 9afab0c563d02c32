//! # bootfmt-core
//!
//! A printf-family formatting engine for boot-time and firmware code.
//!
//! The engine works over byte strings, never assumes hardware 64-bit
//! division, and never assumes a heap: every allocation goes through a
//! [`malloc::Heap`] that may refuse. Output can be measured, written into a
//! bounded buffer, or written into an exactly-sized allocation.
//!
//! ```
//! use bootfmt_core::{args, stdio};
//!
//! let mut buf = [0u8; 16];
//! let n = stdio::snprintf(&mut buf, b"%s=%05d", &args!("id", 42));
//! assert_eq!(&buf[..n], b"id=00042");
//! ```

#![deny(unsafe_code)]

pub mod boot_time;
pub mod config;
pub mod debug;
pub mod error;
pub mod malloc;
pub mod math;
pub mod stdio;
pub mod stdlib;
pub mod string;

pub use error::{BootError, ErrorState};

/// Build an argument array from plain values: integers, `char`, `&str`,
/// `&[u8]`, `Option<&str>`, raw pointers.
///
/// ```
/// use bootfmt_core::{args, stdio};
///
/// let out = stdio::xasprintf(b"%u %s", &args!(7u8, "ok")).unwrap();
/// assert_eq!(out, b"7 ok");
/// ```
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        [$($crate::stdio::Arg::from($arg)),*]
    };
}
