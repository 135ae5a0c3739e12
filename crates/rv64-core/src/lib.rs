//! Core emulator crate for a single-hart RV64I machine.
//!
//! The crate decodes and executes 32-bit RV64I instructions (plus `mul`)
//! against an owned [`Hart`] whose memory is reached through a [`Bus`] of
//! [`Device`]s. Loading images, driving the fetch loop and deciding when to
//! stop are left to the host.

/// Memory model primitives: widths, window checks and the RAM device.
pub mod memory;
pub use memory::{
    resolve_window_offset, AccessWidth, MemoryDevice, DEFAULT_MEMORY_BASE,
    DEFAULT_MEMORY_CAPACITY,
};

/// Device trait and address routing.
pub mod bus;
pub use bus::{Bus, Device, MapError};

/// Host-facing configuration.
pub mod api;
pub use api::HartConfig;

/// Architectural hart state.
pub mod state;
pub use state::{Hart, Register, RegisterFile, ABI_NAMES, GENERAL_REGISTER_COUNT};

/// Opcode and format classification table.
pub mod encoding;
pub use encoding::{Format, Opcode, OPCODE_TABLE};

/// Instruction field and immediate extraction.
pub mod decoder;
pub use decoder::DecodedInstruction;

/// Fault taxonomy for memory and decode failures.
pub mod fault;
pub use fault::{DecodeLevel, Fault, FaultClass};

/// Instruction execution pipeline.
pub mod execute;
pub use execute::{execute_instruction, step_one};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
