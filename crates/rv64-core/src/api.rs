//! Host-facing configuration for embedding the emulator core.

use crate::{DEFAULT_MEMORY_BASE, DEFAULT_MEMORY_CAPACITY};

/// Top-level immutable configuration for a hart and its reference bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct HartConfig {
    /// First address of the RAM window. Also the reset PC.
    pub memory_base: u64,
    /// RAM capacity in bytes. The initial stack pointer is
    /// `memory_base + memory_capacity`.
    pub memory_capacity: u64,
}

impl Default for HartConfig {
    fn default() -> Self {
        Self {
            memory_base: DEFAULT_MEMORY_BASE,
            memory_capacity: DEFAULT_MEMORY_CAPACITY,
        }
    }
}

impl HartConfig {
    /// Returns a configuration for a window of `memory_capacity` bytes at
    /// `memory_base`.
    #[must_use]
    pub const fn new(memory_base: u64, memory_capacity: u64) -> Self {
        Self {
            memory_base,
            memory_capacity,
        }
    }

    /// One past the last address of the RAM window, or `None` when the
    /// window would run past the top of the address space.
    #[must_use]
    pub const fn memory_end(&self) -> Option<u64> {
        self.memory_base.checked_add(self.memory_capacity)
    }

    /// Returns `true` if `addr` lies inside the RAM window.
    #[must_use]
    pub const fn contains(&self, addr: u64) -> bool {
        match self.memory_end() {
            Some(end) => addr >= self.memory_base && addr < end,
            None => false,
        }
    }
}
