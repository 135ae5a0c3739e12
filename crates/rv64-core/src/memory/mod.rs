//! Memory model primitives: access widths, window checks and the RAM device.

/// Width validation and window bounds resolution.
pub mod access;
/// Heap-backed RAM device.
pub mod device;

pub use access::{resolve_window_offset, AccessWidth};
pub use device::MemoryDevice;

/// Reference RAM capacity in bytes (128 MiB).
pub const DEFAULT_MEMORY_CAPACITY: u64 = 128 * 1024 * 1024;

/// Reference address at which RAM is mapped.
pub const DEFAULT_MEMORY_BASE: u64 = 0x8000_0000;

#[cfg(test)]
mod tests {
    use super::{MemoryDevice, DEFAULT_MEMORY_BASE, DEFAULT_MEMORY_CAPACITY};

    #[test]
    fn reference_device_is_128_mib_and_zeroed() {
        let capacity = usize::try_from(DEFAULT_MEMORY_CAPACITY).expect("fits host");
        let memory = MemoryDevice::new(DEFAULT_MEMORY_BASE, capacity);
        assert_eq!(memory.capacity(), 128 * 1024 * 1024);
        assert!(memory.as_bytes().iter().all(|byte| *byte == 0));
    }
}
