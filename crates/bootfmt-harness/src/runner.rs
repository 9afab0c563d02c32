//! Drives the engine for one CLI request and describes the result.

use std::time::Instant;

use bootfmt_core::BootError;
use bootfmt_core::math::divmod64;
use bootfmt_core::stdio::{self, Arg};
use bootfmt_core::stdlib::{ConversionStatus, strtoull_impl};
use serde::Serialize;

use crate::argspec::ArgSpec;
use crate::structured_log::{LogEntry, LogLevel, Outcome};

/// Result of one `format` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatRun {
    /// Bytes that reached the destination, terminator excluded.
    pub output: Vec<u8>,
    /// Logical length of the complete output.
    pub length: usize,
    pub capacity: Option<usize>,
    pub latency_ns: u64,
}

impl FormatRun {
    /// True if a bounded destination could not hold the whole output.
    #[must_use]
    pub fn truncated(&self) -> bool {
        self.output.len() < self.length
    }

    /// Structured record of this run.
    #[must_use]
    pub fn log_entry(&self, trace_id: &str, fmt: &str) -> LogEntry {
        let outcome = if self.truncated() {
            Outcome::Truncated
        } else {
            Outcome::Pass
        };
        let mut entry = LogEntry::new(trace_id, LogLevel::Info, "format")
            .with_format(fmt)
            .with_length(self.length)
            .with_outcome(outcome)
            .with_latency_ns(self.latency_ns);
        if let Some(cap) = self.capacity {
            entry = entry.with_capacity(cap);
        }
        entry
    }
}

/// Format `fmt` with `args`: bounded-format into `capacity` bytes when
/// given, allocate-format otherwise.
pub fn run_format(
    fmt: &[u8],
    args: &[ArgSpec],
    capacity: Option<usize>,
) -> Result<FormatRun, BootError> {
    let slots: Vec<Arg<'_>> = args.iter().map(ArgSpec::as_arg).collect();
    let start = Instant::now();

    let (output, length) = match capacity {
        Some(cap) => {
            let mut buf = vec![0u8; cap];
            let length = stdio::snprintf(&mut buf, fmt, &slots);
            buf.truncate(length.min(cap.saturating_sub(1)));
            (buf, length)
        }
        None => {
            let out = stdio::xasprintf(fmt, &slots)?;
            let length = out.len();
            (out, length)
        }
    };

    Ok(FormatRun {
        output,
        length,
        capacity,
        latency_ns: u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX),
    })
}

/// Quotient and remainder of one division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DivmodReport {
    pub dividend: u64,
    pub divisor: u64,
    pub quotient: u64,
    pub remainder: u64,
}

/// Divide, refusing a zero divisor instead of panicking.
#[must_use]
pub fn run_divmod(dividend: u64, divisor: u64) -> Option<DivmodReport> {
    if divisor == 0 {
        return None;
    }
    let (quotient, remainder) = divmod64(dividend, divisor);
    Some(DivmodReport {
        dividend,
        divisor,
        quotient,
        remainder,
    })
}

/// Outcome of the unsigned parser on one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseReport {
    pub value: u64,
    pub consumed: usize,
    pub status: &'static str,
}

#[must_use]
pub fn run_parse(text: &str, base: u32) -> ParseReport {
    let (value, consumed, status) = strtoull_impl(text.as_bytes(), base);
    let status = match status {
        ConversionStatus::Success => "success",
        ConversionStatus::Overflow => "overflow",
        ConversionStatus::BadNumber => "bad_number",
    };
    ParseReport {
        value,
        consumed,
        status,
    }
}
