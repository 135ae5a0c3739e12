//! Host runner for the rv64-core emulator: run loop and register dump.

use anyhow as _;
use clap as _;
use tracing_subscriber as _;
#[cfg(test)]
use tempfile as _;

/// Fetch/advance/execute loop with stop conditions.
pub mod driver;
pub use driver::{run, RunPolicy, RunSummary, StopReason};

/// Register dump formatting.
pub mod dump;
pub use dump::format_registers;
