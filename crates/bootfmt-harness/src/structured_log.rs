//! Structured JSONL logging for harness runs.
//!
//! Provides:
//! - [`LogEntry`]: one JSONL record with required and optional fields.
//! - [`LogEmitter`]: writes records to a file, stdout, or a buffer.
//! - [`validate_log_line`]: checks a single line against the record schema.
//! - [`validate_log_file`]: checks a whole file.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

// ---------------------------------------------------------------------------
// Log entry
// ---------------------------------------------------------------------------

/// Severity level for log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Result of the logged operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Truncated,
    Fail,
    Error,
}

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const OUTCOMES: [&str; 4] = ["pass", "truncated", "fail", "error"];

/// Structured log record.
///
/// Required fields: `timestamp`, `trace_id`, `level`, `event`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub trace_id: String,
    pub level: LogLevel,
    pub event: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Logical output length reported by the engine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    /// Destination capacity for bounded runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ns: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl LogEntry {
    /// Create a new log entry with required fields only.
    #[must_use]
    pub fn new(trace_id: impl Into<String>, level: LogLevel, event: impl Into<String>) -> Self {
        Self {
            timestamp: now_utc(),
            trace_id: trace_id.into(),
            level,
            event: event.into(),
            format: None,
            length: None,
            capacity: None,
            outcome: None,
            latency_ns: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    #[must_use]
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    #[must_use]
    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    #[must_use]
    pub fn with_latency_ns(mut self, ns: u64) -> Self {
        self.latency_ns = Some(ns);
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Serialize to a single JSON line (no trailing newline).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// ---------------------------------------------------------------------------
// Log emitter
// ---------------------------------------------------------------------------

enum Sink {
    File(std::io::BufWriter<std::fs::File>),
    Stdout(std::io::Stdout),
    Buffer(Vec<u8>),
}

impl Sink {
    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::File(w) => w,
            Self::Stdout(w) => w,
            Self::Buffer(w) => w,
        }
    }
}

/// Writes structured JSONL log entries.
pub struct LogEmitter {
    sink: Sink,
    seq: u64,
    run_id: String,
}

impl LogEmitter {
    /// Create an emitter that appends to a file, creating it if needed.
    pub fn to_file(path: &Path, run_id: &str) -> std::io::Result<Self> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self::with_sink(
            Sink::File(std::io::BufWriter::new(file)),
            run_id,
        ))
    }

    #[must_use]
    pub fn to_stdout(run_id: &str) -> Self {
        Self::with_sink(Sink::Stdout(std::io::stdout()), run_id)
    }

    /// Create an emitter that collects lines in memory.
    #[must_use]
    pub fn to_buffer(run_id: &str) -> Self {
        Self::with_sink(Sink::Buffer(Vec::new()), run_id)
    }

    fn with_sink(sink: Sink, run_id: &str) -> Self {
        Self {
            sink,
            seq: 0,
            run_id: run_id.to_string(),
        }
    }

    /// Lines collected by a buffer emitter; empty for other sinks.
    #[must_use]
    pub fn buffer(&self) -> &[u8] {
        match &self.sink {
            Sink::Buffer(buf) => buf,
            _ => &[],
        }
    }

    fn next_trace_id(&mut self) -> String {
        self.seq += 1;
        format!("bootfmt::{}::{:03}", self.run_id, self.seq)
    }

    /// Emit an entry with only the required fields.
    pub fn emit(&mut self, level: LogLevel, event: &str) -> std::io::Result<LogEntry> {
        let trace_id = self.next_trace_id();
        let entry = LogEntry::new(trace_id, level, event);
        self.write_line(&entry)?;
        Ok(entry)
    }

    /// Emit a populated entry, assigning a trace id if it has none.
    pub fn emit_entry(&mut self, mut entry: LogEntry) -> std::io::Result<()> {
        if entry.trace_id.is_empty() {
            entry.trace_id = self.next_trace_id();
        }
        self.write_line(&entry)
    }

    fn write_line(&mut self, entry: &LogEntry) -> std::io::Result<()> {
        let line = entry.to_jsonl().map_err(std::io::Error::other)?;
        writeln!(self.sink.writer(), "{line}")
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.sink.writer().flush()
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validation error for a log line.
#[derive(Debug, thiserror::Error)]
#[error("line {line_number}: field '{field}': {message}")]
pub struct LogValidationError {
    pub line_number: usize,
    pub field: String,
    pub message: String,
}

impl LogValidationError {
    fn new(line_number: usize, field: &str, message: impl Into<String>) -> Self {
        Self {
            line_number,
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a single JSONL line against the schema.
pub fn validate_log_line(
    line: &str,
    line_number: usize,
) -> Result<LogEntry, Vec<LogValidationError>> {
    let value: serde_json::Value = serde_json::from_str(line).map_err(|e| {
        vec![LogValidationError::new(
            line_number,
            "<json>",
            format!("invalid JSON: {e}"),
        )]
    })?;

    let Some(obj) = value.as_object() else {
        return Err(vec![LogValidationError::new(
            line_number,
            "<root>",
            "expected JSON object",
        )]);
    };

    let mut errors = Vec::new();
    for field in ["timestamp", "trace_id", "level", "event"] {
        if !obj.contains_key(field) {
            errors.push(LogValidationError::new(
                line_number,
                field,
                "required field missing",
            ));
        }
    }

    if let Some(level) = obj.get("level").and_then(|v| v.as_str())
        && !LEVELS.contains(&level)
    {
        errors.push(LogValidationError::new(
            line_number,
            "level",
            format!("invalid level: '{level}'"),
        ));
    }

    if let Some(outcome) = obj.get("outcome").and_then(|v| v.as_str())
        && !OUTCOMES.contains(&outcome)
    {
        errors.push(LogValidationError::new(
            line_number,
            "outcome",
            format!("invalid outcome: '{outcome}'"),
        ));
    }

    if let (Some(len), Some(cap)) = (
        obj.get("length").and_then(|v| v.as_u64()),
        obj.get("capacity").and_then(|v| v.as_u64()),
    ) && obj.get("outcome").and_then(|v| v.as_str()) == Some("pass")
        && cap > 0
        && len >= cap
    {
        errors.push(LogValidationError::new(
            line_number,
            "outcome",
            format!("length {len} does not fit capacity {cap} but outcome is 'pass'"),
        ));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    serde_json::from_value::<LogEntry>(value).map_err(|e| {
        vec![LogValidationError::new(
            line_number,
            "<deserialization>",
            format!("failed to deserialize: {e}"),
        )]
    })
}

/// Validate an entire JSONL file.
///
/// Returns the number of non-empty lines and any validation errors found.
pub fn validate_log_file(path: &Path) -> Result<(usize, Vec<LogValidationError>), std::io::Error> {
    let content = std::fs::read_to_string(path)?;
    let mut all_errors = Vec::new();
    let mut line_count = 0;

    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        line_count += 1;
        if let Err(errs) = validate_log_line(line, i + 1) {
            all_errors.extend(errs);
        }
    }

    Ok((line_count, all_errors))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn now_utc() -> String {
    let duration = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    let secs = duration.as_secs();
    let (year, month, day) = civil_from_days(secs / 86_400);
    format!(
        "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}.{:03}Z",
        (secs % 86_400) / 3600,
        (secs % 3600) / 60,
        secs % 60,
        duration.subsec_millis(),
    )
}

/// Proleptic Gregorian date for a day count since 1970-01-01.
fn civil_from_days(days: u64) -> (u64, u64, u64) {
    let z = days + 719_468;
    let era = z / 146_097;
    let doe = z % 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + u64::from(month <= 2);
    (year, month, day)
}
