#![no_main]
use bootfmt_core::BootError;
use bootfmt_core::stdio::{self, Arg};
use libfuzzer_sys::fuzz_target;

/// Longest output the target is willing to allocate.
const MAX_ALLOC: usize = 1 << 20;

fuzz_target!(|data: &[u8]| {
    // First byte picks the capacity, the rest is the format string.
    let Some((&cap, fmt)) = data.split_first() else {
        return;
    };
    let args = [
        Arg::Int(-1),
        Arg::Uint(u64::MAX),
        Arg::Str(Some(b"fuzz")),
        Arg::Str(None),
        Arg::Char(0x10_ffff),
        Arg::Ptr(0x1000),
    ];

    let len = stdio::format_len(fmt, &args);
    if len == usize::MAX {
        assert_eq!(stdio::xasprintf(fmt, &args), Err(BootError::OutOfMemory));
    }
    if len > MAX_ALLOC {
        return;
    }
    let full = stdio::xasprintf(fmt, &args).expect("output under MAX_ALLOC");
    assert_eq!(full.len(), len);

    let cap = usize::from(cap);
    let mut buf = vec![0xA5u8; cap];
    assert_eq!(stdio::snprintf(&mut buf, fmt, &args), len);
    if cap > 0 {
        let stored = len.min(cap - 1);
        assert_eq!(&buf[..stored], &full[..stored]);
        assert_eq!(buf[stored], 0);
    }
});
