//! Fetch/advance/execute loop and its stop conditions.

use rv64_core::{step_one, Device, Fault, Hart};
use tracing::{debug, info};

/// Stop conditions applied between instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPolicy {
    /// Stop after this many retired instructions.
    pub max_steps: Option<u64>,
    /// Stop once the PC reaches the first address past the loaded image.
    pub stop_at_image_end: bool,
}

impl Default for RunPolicy {
    fn default() -> Self {
        Self {
            max_steps: None,
            stop_at_image_end: true,
        }
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Fetch or execute raised a fault.
    Fault(Fault),
    /// The PC left the configured memory window.
    LeftWindow {
        /// PC at the time of the check.
        pc: u64,
    },
    /// The PC reached the end of the loaded image.
    ImageEnd {
        /// PC at the time of the check.
        pc: u64,
    },
    /// The retired-instruction limit was reached.
    StepLimit,
}

impl StopReason {
    /// Returns `true` if the run ended without a fault.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        !matches!(self, Self::Fault(_))
    }
}

/// Outcome of [`run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Instructions retired before stopping.
    pub steps: u64,
    /// Stop condition that ended the loop.
    pub reason: StopReason,
}

/// Drives `hart` until a stop condition holds. `image_len` is the size of the
/// image passed to [`Hart::initialize`].
pub fn run<B: Device>(hart: &mut Hart<B>, image_len: u64, policy: &RunPolicy) -> RunSummary {
    let config = *hart.config();
    let image_end = config.memory_base.saturating_add(image_len);
    let mut steps = 0_u64;

    let reason = loop {
        if policy.max_steps.is_some_and(|limit| steps >= limit) {
            break StopReason::StepLimit;
        }

        let pc = hart.pc();
        if !config.contains(pc) {
            break StopReason::LeftWindow { pc };
        }
        if policy.stop_at_image_end && pc >= image_end {
            break StopReason::ImageEnd { pc };
        }

        match step_one(hart) {
            Ok(_) => steps += 1,
            Err(fault) => break StopReason::Fault(fault),
        }
    };

    match reason {
        StopReason::Fault(fault) => info!(%fault, steps, "hart stopped on fault"),
        StopReason::StepLimit => info!(steps, "step limit reached"),
        StopReason::LeftWindow { pc } | StopReason::ImageEnd { pc } => {
            debug!(steps, "hart stopped at pc {pc:#x}");
        }
    }

    RunSummary { steps, reason }
}
