//! Formatted output.
//!
//! Every entry point runs the same two passes: the argument scanner types
//! and extracts the caller's slots into an [`ArgumentList`], then the
//! renderer walks the format again through a [`BoundedWriter`].
//!
//! - [`snprintf`]/[`vsnprintf_in`]: bounded-format into a caller buffer,
//!   returning the length the full output would have had.
//! - [`format_len`]: dry run, measures without writing.
//! - [`xasprintf`]/[`xasprintf_in`]: allocate-format, an exactly-sized
//!   heap buffer.
//! - [`console::Printer`]: console printing through a scratch buffer.

pub mod args;
pub mod console;
#[cfg(feature = "efi")]
pub mod efi;
pub mod printf;
pub mod writer;

pub use args::{Arg, ArgType, ArgumentList, FormatArgument, PREALLOC_ARGS, Referent};
pub use console::{OutputSink, Platform, Printer};
pub use printf::{Conversion, Directive, FormatSpec, LengthMod, directives, parse_format_spec};
pub use writer::BoundedWriter;

use crate::error::{BootError, ErrorState};
use crate::malloc::{Heap, SystemHeap};

/// Render an already-extracted list into `dest` (or measure with `None`).
/// Returns the logical output length.
pub fn render_list(dest: Option<&mut [u8]>, fmt: &[u8], list: &ArgumentList<'_>) -> usize {
    let mut out = BoundedWriter::from_option(dest);
    printf::render(&mut out, fmt, list);
    out.finish()
}

/// Bounded-format with an explicit heap for the argument list.
///
/// Writes at most `dest.len() - 1` bytes followed by a NUL; a zero-length
/// destination is left untouched. Returns the length of the complete
/// output, which is `>= dest.len()` exactly when it was truncated.
pub fn vsnprintf_in<H: Heap + ?Sized>(
    heap: &H,
    dest: Option<&mut [u8]>,
    fmt: &[u8],
    args: &[Arg<'_>],
) -> usize {
    let list = ArgumentList::collect(fmt, args, heap);
    render_list(dest, fmt, &list)
}

/// Bounded-format into `dest`.
pub fn snprintf(dest: &mut [u8], fmt: &[u8], args: &[Arg<'_>]) -> usize {
    vsnprintf_in(&SystemHeap, Some(dest), fmt, args)
}

/// Length of the formatted output, without writing anything.
#[must_use]
pub fn format_len(fmt: &[u8], args: &[Arg<'_>]) -> usize {
    vsnprintf_in(&SystemHeap, None, fmt, args)
}

/// Allocate-format: measure, allocate exactly, render.
///
/// The returned buffer holds the formatted bytes without the terminator.
/// When the heap refuses, the pending error is popped from `errors` and
/// [`BootError::OutOfMemory`] is returned.
pub fn xasprintf_in<H: Heap + ?Sized>(
    heap: &H,
    errors: &mut ErrorState,
    fmt: &[u8],
    args: &[Arg<'_>],
) -> Result<Vec<u8>, BootError> {
    let list = ArgumentList::collect(fmt, args, heap);
    let len = render_list(None, fmt, &list);

    let mut buf = match len
        .checked_add(1)
        .ok_or(BootError::OutOfMemory)
        .and_then(|size| heap.try_alloc_bytes(size))
    {
        Ok(buf) => buf,
        Err(err) => {
            errors.set(err);
            errors.pop();
            return Err(err);
        }
    };

    let written = render_list(Some(&mut buf[..]), fmt, &list);
    debug_assert_eq!(written, len);
    buf.truncate(len);
    Ok(buf)
}

/// Allocate-format on the system heap.
pub fn xasprintf(fmt: &[u8], args: &[Arg<'_>]) -> Result<Vec<u8>, BootError> {
    xasprintf_in(&SystemHeap, &mut ErrorState::new(), fmt, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::malloc::BudgetHeap;

    #[test]
    fn test_snprintf_fits() {
        let mut buf = [0xAAu8; 16];
        let n = snprintf(&mut buf, b"%s=%d", &[Arg::from("x"), Arg::from(10)]);
        assert_eq!(n, 4);
        assert_eq!(&buf[..5], b"x=10\0");
    }

    #[test]
    fn test_snprintf_truncates() {
        let mut buf = [0xAAu8; 4];
        let n = snprintf(&mut buf, b"hello", &[]);
        assert_eq!(n, 5);
        assert_eq!(&buf, b"hel\0");
    }

    #[test]
    fn test_snprintf_zero_capacity() {
        let mut buf = [0xAAu8; 0];
        assert_eq!(snprintf(&mut buf, b"%d", &[Arg::from(123)]), 3);
    }

    #[test]
    fn test_format_len() {
        assert_eq!(format_len(b"%5d|%s", &[Arg::from(1), Arg::from("ab")]), 8);
        assert_eq!(format_len(b"", &[]), 0);
    }

    #[test]
    fn test_xasprintf() {
        let out = xasprintf(b"%x-%C", &[Arg::from(255u32), Arg::from('\u{e9}')]).unwrap();
        assert_eq!(out, "ff-\u{e9}".as_bytes());
    }

    #[test]
    fn test_xasprintf_empty() {
        assert_eq!(xasprintf(b"", &[]).unwrap(), b"");
    }

    #[test]
    fn test_xasprintf_out_of_memory_pops_error() {
        let heap = BudgetHeap::new(3);
        let mut errors = ErrorState::new();
        errors.set(BootError::BadNumber);
        assert!(errors.push());

        let res = xasprintf_in(&heap, &mut errors, b"abc", &[]);
        assert_eq!(res, Err(BootError::OutOfMemory));
        // the error saved by the caller is back in place
        assert_eq!(errors.current(), Some(BootError::BadNumber));
        assert_eq!(errors.depth(), 0);
    }

    #[test]
    fn test_xasprintf_out_of_memory_without_saved_error_clears() {
        let heap = BudgetHeap::new(0);
        let mut errors = ErrorState::new();
        let res = xasprintf_in(&heap, &mut errors, b"x", &[]);
        assert_eq!(res, Err(BootError::OutOfMemory));
        assert_eq!(errors.current(), None);
    }
}
