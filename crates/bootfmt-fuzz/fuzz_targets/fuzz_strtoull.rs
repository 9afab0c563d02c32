#![no_main]
use bootfmt_core::stdlib::{ConversionStatus, strtoull_impl};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&base, text)) = data.split_first() else {
        return;
    };
    let base = u32::from(base % 40);
    let (value, consumed, status) = strtoull_impl(text, base);

    assert!(consumed <= text.len());
    match status {
        ConversionStatus::Success => {
            if let Ok(s) = std::str::from_utf8(&text[..consumed]) {
                let digits = s.trim_start_matches([' ', '\t', '\r', '\n']);
                if base == 10 && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                    assert_eq!(digits.parse::<u64>().ok(), Some(value));
                }
            }
        }
        ConversionStatus::Overflow => assert_eq!(value, u64::MAX),
        ConversionStatus::BadNumber => assert_eq!((value, consumed), (0, 0)),
    }
});
