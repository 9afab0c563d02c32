//! Command-line harness for bootfmt.
//!
//! This crate provides:
//! - Argument slots spelled on the command line (`i:-1`, `s:text`, ...)
//! - Runners for the `format`, `divmod` and `parse` subcommands
//! - Structured JSONL logging of each run

#![forbid(unsafe_code)]

pub mod argspec;
pub mod runner;
pub mod structured_log;

pub use argspec::{ArgSpec, ArgSpecError};
pub use runner::{FormatRun, run_divmod, run_format, run_parse};
