//! Architectural hart state: integer registers, PC and the owned bus.

/// Hart container and driver-facing operations.
pub mod hart;
/// Integer register identifiers and storage.
pub mod registers;

pub use hart::Hart;
pub use registers::{Register, RegisterFile, ABI_NAMES, GENERAL_REGISTER_COUNT};
