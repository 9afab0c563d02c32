//! CLI entrypoint for the bootfmt harness.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use bootfmt_harness::structured_log::LogEmitter;
use bootfmt_harness::{ArgSpec, run_divmod, run_format, run_parse};
use clap::{Parser, Subcommand};

/// Drive the bootfmt formatting engine from a shell.
#[derive(Debug, Parser)]
#[command(name = "bootfmt-harness")]
#[command(about = "Command-line harness for the bootfmt formatting engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Format arguments and print the result.
    Format {
        /// printf-style format string.
        #[arg(long)]
        format: String,
        /// Destination capacity; formats into a bounded buffer when set.
        #[arg(long)]
        capacity: Option<usize>,
        /// Append a JSONL log entry to this path (stdout if omitted).
        #[arg(long)]
        log: Option<PathBuf>,
        /// Arguments as `<tag>:<value>` (tags: i, u, s, c, p).
        #[arg(allow_hyphen_values = true)]
        args: Vec<ArgSpec>,
    },
    /// Divide with the software 64-bit divider.
    Divmod {
        dividend: u64,
        divisor: u64,
    },
    /// Run the unsigned number parser.
    Parse {
        text: String,
        /// Radix, 0 for auto-detection.
        #[arg(long, default_value_t = 0)]
        base: u32,
    },
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Format {
            format,
            capacity,
            log,
            args,
        } => {
            let run = run_format(format.as_bytes(), &args, capacity)?;

            let mut stdout = std::io::stdout();
            stdout.write_all(&run.output)?;
            stdout.write_all(b"\n")?;
            if run.truncated() {
                eprintln!(
                    "truncated: {} of {} bytes stored",
                    run.output.len(),
                    run.length
                );
            }

            let mut emitter = match log {
                Some(path) => LogEmitter::to_file(&path, "cli")?,
                None => LogEmitter::to_stdout("cli"),
            };
            emitter.emit_entry(run.log_entry("", &format))?;
            emitter.flush()?;
        }
        Command::Divmod { dividend, divisor } => {
            let Some(report) = run_divmod(dividend, divisor) else {
                eprintln!("divmod: divisor must be non-zero");
                return Ok(ExitCode::FAILURE);
            };
            println!("{}", serde_json::to_string(&report)?);
        }
        Command::Parse { text, base } => {
            let report = run_parse(&text, base);
            println!("{}", serde_json::to_string(&report)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}
