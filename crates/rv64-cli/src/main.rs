//! CLI entry point for the `rv64emu` runner.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use rv64_cli::{format_registers, run, RunPolicy, StopReason};
use rv64_core::{Hart, HartConfig, DEFAULT_MEMORY_BASE, DEFAULT_MEMORY_CAPACITY};
#[cfg(test)]
use tempfile as _;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Runs a raw RV64I image and prints the final register file.
#[derive(Parser, Debug)]
#[command(name = "rv64emu", version, about)]
struct Args {
    /// Raw little-endian program image, loaded at the memory base.
    #[arg(short = 'f', long = "file", value_name = "BINARY")]
    file: PathBuf,

    /// First address of RAM and the reset PC. Accepts `0x` hex.
    #[arg(long, value_name = "ADDR", value_parser = parse_number, default_value_t = DEFAULT_MEMORY_BASE)]
    memory_base: u64,

    /// RAM size in bytes. Accepts `0x` hex.
    #[arg(long, value_name = "BYTES", value_parser = parse_number, default_value_t = DEFAULT_MEMORY_CAPACITY)]
    memory_size: u64,

    /// Stop after this many retired instructions.
    #[arg(long, value_name = "N", value_parser = parse_number)]
    max_steps: Option<u64>,

    /// Keep running past the end of the loaded image.
    #[arg(long, default_value_t = false)]
    no_stop_at_image_end: bool,

    /// Log filter used when `RUST_LOG` is unset (e.g. `debug`, `rv64_core=trace`).
    #[arg(long, value_name = "FILTER", default_value = "warn", env = "RV64EMU_LOG")]
    log_level: String,
}

fn parse_number(text: &str) -> Result<u64, String> {
    let text = text.replace('_', "");
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|e| format!("invalid number `{text}`: {e}"))
}

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn execute(args: &Args) -> Result<bool> {
    let image = fs::read(&args.file)
        .with_context(|| format!("failed to read image {}", args.file.display()))?;

    let config = HartConfig::new(args.memory_base, args.memory_size);
    let mut hart = Hart::new(&config).context("invalid memory window")?;
    hart.initialize(&image)
        .with_context(|| format!("image of {} bytes does not fit in memory", image.len()))?;
    info!(path = %args.file.display(), bytes = image.len(), "image loaded");

    let policy = RunPolicy {
        max_steps: args.max_steps,
        stop_at_image_end: !args.no_stop_at_image_end,
    };
    let summary = run(&mut hart, image.len() as u64, &policy);

    print!("{}", format_registers(&hart.dump_registers()));

    if let StopReason::Fault(fault) = summary.reason {
        eprintln!("error: {fault} (pc {:#x})", hart.pc());
    }
    Ok(summary.reason.is_clean())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level);

    match execute(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_number, Args};
    use clap::Parser;

    #[test]
    fn numbers_accept_hex_and_decimal() {
        assert_eq!(parse_number("0x8000_0000"), Ok(0x8000_0000));
        assert_eq!(parse_number("4096"), Ok(4096));
        assert!(parse_number("0xzz").is_err());
    }

    #[test]
    fn defaults_match_reference_machine() {
        let args = Args::try_parse_from(["rv64emu", "-f", "prog.bin"]).expect("valid args");
        assert_eq!(args.memory_base, 0x8000_0000);
        assert_eq!(args.memory_size, 128 * 1024 * 1024);
        assert_eq!(args.max_steps, None);
        assert!(!args.no_stop_at_image_end);
    }
}
