//! Heap-backed RAM device.

use super::access::{resolve_window_offset, AccessWidth};
use crate::{Device, Fault};

/// Fixed-capacity byte store addressed through the window
/// `[base, base + capacity)`.
///
/// Loads and stores are little-endian and take effect immediately; there is
/// no caching or write buffering.
#[derive(Clone, PartialEq, Eq)]
pub struct MemoryDevice {
    base: u64,
    bytes: Box<[u8]>,
}

impl std::fmt::Debug for MemoryDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDevice")
            .field("base", &format_args!("{:#x}", self.base))
            .field("capacity", &self.bytes.len())
            .finish()
    }
}

impl MemoryDevice {
    /// Allocates a zeroed device of `capacity` bytes mapped at `base`.
    #[must_use]
    pub fn new(base: u64, capacity: usize) -> Self {
        Self {
            base,
            bytes: vec![0; capacity].into_boxed_slice(),
        }
    }

    /// First address of the device window.
    #[must_use]
    pub const fn base(&self) -> u64 {
        self.base
    }

    /// Size of the device window in bytes.
    #[must_use]
    pub fn capacity(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Raw view of the backing store, offset 0 being `base()`.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn span(&self, addr: u64, len: usize, width: u8) -> Result<std::ops::Range<usize>, Fault> {
        let offset = resolve_window_offset(self.base, self.capacity(), addr, len as u64, width)?;
        // The window check bounds `offset + len` by the slice length.
        let start = usize::try_from(offset).map_err(|_| Fault::OutOfBounds { addr, width })?;
        Ok(start..start + len)
    }
}

impl Device for MemoryDevice {
    fn load(&mut self, addr: u64, width: u8) -> Result<u64, Fault> {
        let access = AccessWidth::from_bits(width)?;
        let span = self.span(addr, access.bytes(), width)?;

        let mut raw = [0_u8; 8];
        raw[..access.bytes()].copy_from_slice(&self.bytes[span]);
        Ok(u64::from_le_bytes(raw))
    }

    fn store(&mut self, addr: u64, width: u8, value: u64) -> Result<(), Fault> {
        let access = AccessWidth::from_bits(width)?;
        let span = self.span(addr, access.bytes(), width)?;

        let raw = (value & access.mask()).to_le_bytes();
        self.bytes[span].copy_from_slice(&raw[..access.bytes()]);
        Ok(())
    }

    fn write_bytes(&mut self, addr: u64, data: &[u8]) -> Result<(), Fault> {
        let span = self.span(addr, data.len(), AccessWidth::Byte.bits())?;
        self.bytes[span].copy_from_slice(data);
        Ok(())
    }
}
