//! Address-space contract between the execution engine and backing devices.

use thiserror::Error;

use crate::{Fault, MemoryDevice};

/// Capability interface implemented by anything that can sit on the bus.
///
/// Addresses are absolute; each device resolves them against its own window.
pub trait Device {
    /// Loads `width` bits (8, 16, 32 or 64) at `addr`, zero-extended.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::UnsupportedWidth`] for other widths and
    /// [`Fault::OutOfBounds`] when the access leaves the device window.
    fn load(&mut self, addr: u64, width: u8) -> Result<u64, Fault>;

    /// Stores the low `width` bits of `value` at `addr`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Device::load`].
    fn store(&mut self, addr: u64, width: u8, value: u64) -> Result<(), Fault>;

    /// Copies `data` verbatim starting at `addr`.
    ///
    /// The default implementation issues one byte store per element; devices
    /// with a flat backing store should override it.
    ///
    /// # Errors
    ///
    /// Returns the first fault raised by the underlying stores.
    fn write_bytes(&mut self, addr: u64, data: &[u8]) -> Result<(), Fault> {
        for (offset, byte) in (0_u64..).zip(data) {
            let target = addr
                .checked_add(offset)
                .ok_or(Fault::OutOfBounds { addr, width: 8 })?;
            self.store(target, 8, u64::from(*byte))?;
        }
        Ok(())
    }
}

impl<D: Device + ?Sized> Device for Box<D> {
    fn load(&mut self, addr: u64, width: u8) -> Result<u64, Fault> {
        (**self).load(addr, width)
    }

    fn store(&mut self, addr: u64, width: u8, value: u64) -> Result<(), Fault> {
        (**self).store(addr, width, value)
    }

    fn write_bytes(&mut self, addr: u64, data: &[u8]) -> Result<(), Fault> {
        (**self).write_bytes(addr, data)
    }
}

/// Rejected bus mapping requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum MapError {
    /// Requested range has zero length or runs past the top of the address space.
    #[error("invalid mapping of {len:#x} bytes at {start:#x}")]
    InvalidRange {
        /// Requested first address.
        start: u64,
        /// Requested length in bytes.
        len: u64,
    },
    /// Requested range intersects an existing mapping.
    #[error("mapping at {start:#x} overlaps the device mapped at {existing:#x}")]
    Overlap {
        /// Requested first address.
        start: u64,
        /// First address of the conflicting mapping.
        existing: u64,
    },
}

struct Mapping {
    start: u64,
    end: u64,
    device: Box<dyn Device>,
}

impl Mapping {
    fn contains(&self, addr: u64) -> bool {
        addr >= self.start && addr < self.end
    }
}

/// Single logical address window routing accesses to mapped devices.
///
/// Accesses are routed by their first byte address. An address owned by no
/// device faults with [`Fault::OutOfBounds`]; device faults pass through
/// unchanged.
///
/// The base names the first address of the window and is where
/// [`Bus::with_ram`] places RAM. It is never subtracted from an access:
/// mappings and devices both see absolute addresses.
pub struct Bus {
    base: u64,
    mappings: Vec<Mapping>,
}

impl std::fmt::Debug for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ranges: Vec<_> = self
            .mappings
            .iter()
            .map(|m| format!("{:#x}..{:#x}", m.start, m.end))
            .collect();
        f.debug_struct("Bus")
            .field("base", &format_args!("{:#x}", self.base))
            .field("mappings", &ranges)
            .finish()
    }
}

impl Bus {
    /// Creates an empty bus whose window starts at `base`.
    #[must_use]
    pub const fn new(base: u64) -> Self {
        Self {
            base,
            mappings: Vec::new(),
        }
    }

    /// Creates the reference bus: one zeroed RAM device of `capacity` bytes
    /// mapped at `base`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidRange`] when `capacity` is zero or does not
    /// fit the address space above `base`.
    pub fn with_ram(base: u64, capacity: u64) -> Result<Self, MapError> {
        let invalid = MapError::InvalidRange {
            start: base,
            len: capacity,
        };
        let size = usize::try_from(capacity).map_err(|_| invalid)?;
        let mut bus = Self::new(base);
        bus.map(base, capacity, Box::new(MemoryDevice::new(base, size)))?;
        Ok(bus)
    }

    /// First address of the bus window. Informational only; routing uses
    /// absolute addresses.
    #[must_use]
    pub const fn base(&self) -> u64 {
        self.base
    }

    /// Maps `device` over `[start, start + len)`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidRange`] for empty or wrapping ranges and
    /// [`MapError::Overlap`] when the range intersects an existing mapping.
    pub fn map(&mut self, start: u64, len: u64, device: Box<dyn Device>) -> Result<(), MapError> {
        let end = match start.checked_add(len) {
            Some(end) if len > 0 => end,
            _ => return Err(MapError::InvalidRange { start, len }),
        };

        if let Some(existing) = self
            .mappings
            .iter()
            .find(|m| start < m.end && m.start < end)
        {
            return Err(MapError::Overlap {
                start,
                existing: existing.start,
            });
        }

        let index = self.mappings.partition_point(|m| m.start < start);
        self.mappings.insert(index, Mapping { start, end, device });
        Ok(())
    }

    fn route(&mut self, addr: u64, width: u8) -> Result<&mut Mapping, Fault> {
        self.mappings
            .iter_mut()
            .find(|m| m.contains(addr))
            .ok_or(Fault::OutOfBounds { addr, width })
    }
}

impl Device for Bus {
    fn load(&mut self, addr: u64, width: u8) -> Result<u64, Fault> {
        self.route(addr, width)?.device.load(addr, width)
    }

    fn store(&mut self, addr: u64, width: u8, value: u64) -> Result<(), Fault> {
        self.route(addr, width)?.device.store(addr, width, value)
    }

    fn write_bytes(&mut self, addr: u64, data: &[u8]) -> Result<(), Fault> {
        if data.is_empty() {
            return Ok(());
        }
        self.route(addr, 8)?.device.write_bytes(addr, data)
    }
}

#[cfg(test)]
mod tests {
    use super::{Bus, Device, MapError};
    use crate::{Fault, MemoryDevice};

    const BASE: u64 = 0x8000_0000;

    /// Device that answers every load with a fixed pattern and records stores.
    #[derive(Default)]
    struct Latch {
        stores: Vec<(u64, u8, u64)>,
    }

    impl Device for Latch {
        fn load(&mut self, _addr: u64, _width: u8) -> Result<u64, Fault> {
            Ok(0xA5)
        }

        fn store(&mut self, addr: u64, width: u8, value: u64) -> Result<(), Fault> {
            self.stores.push((addr, width, value));
            Ok(())
        }
    }

    #[test]
    fn reference_bus_routes_to_ram() {
        let mut bus = Bus::with_ram(BASE, 64).expect("valid mapping");
        assert_eq!(bus.base(), BASE);
        bus.store(BASE + 8, 32, 0xDEAD_BEEF).expect("in bounds");
        assert_eq!(bus.load(BASE + 8, 32), Ok(0xDEAD_BEEF));
    }

    #[test]
    fn unmapped_addresses_fault_out_of_bounds() {
        let mut bus = Bus::with_ram(BASE, 64).expect("valid mapping");
        assert_eq!(
            bus.load(BASE - 1, 8),
            Err(Fault::OutOfBounds {
                addr: BASE - 1,
                width: 8
            })
        );
        assert_eq!(
            bus.store(BASE + 64, 64, 0),
            Err(Fault::OutOfBounds {
                addr: BASE + 64,
                width: 64
            })
        );
    }

    #[test]
    fn device_faults_pass_through_unchanged() {
        let mut bus = Bus::with_ram(BASE, 64).expect("valid mapping");
        assert_eq!(
            bus.load(BASE, 7),
            Err(Fault::UnsupportedWidth { width: 7 })
        );
        assert_eq!(
            bus.load(BASE + 60, 64),
            Err(Fault::OutOfBounds {
                addr: BASE + 60,
                width: 64
            })
        );
    }

    #[test]
    fn base_does_not_offset_addresses() {
        let mut bus = Bus::new(BASE);
        bus.map(0x100, 0x10, Box::new(MemoryDevice::new(0x100, 0x10)))
            .expect("disjoint mapping");
        assert_eq!(bus.base(), BASE);
        bus.store(0x104, 8, 0x5A).expect("absolute address");
        assert_eq!(bus.load(0x104, 8), Ok(0x5A));
        assert_eq!(
            bus.load(BASE + 0x104, 8),
            Err(Fault::OutOfBounds {
                addr: BASE + 0x104,
                width: 8
            })
        );
    }

    #[test]
    fn additional_devices_map_beside_ram() {
        let mut bus = Bus::with_ram(BASE, 64).expect("valid mapping");
        bus.map(0x1000_0000, 0x100, Box::new(Latch::default()))
            .expect("disjoint mapping");

        assert_eq!(bus.load(0x1000_0010, 8), Ok(0xA5));
        bus.store(0x1000_0004, 32, 7).expect("latched");
        assert_eq!(bus.load(BASE, 64), Ok(0));
    }

    #[test]
    fn overlapping_and_empty_mappings_are_rejected() {
        let mut bus = Bus::with_ram(BASE, 64).expect("valid mapping");
        assert_eq!(
            bus.map(BASE + 32, 64, Box::new(Latch::default())),
            Err(MapError::Overlap {
                start: BASE + 32,
                existing: BASE
            })
        );
        assert_eq!(
            bus.map(0, 0, Box::new(Latch::default())),
            Err(MapError::InvalidRange { start: 0, len: 0 })
        );
        assert_eq!(
            bus.map(u64::MAX, 2, Box::new(Latch::default())),
            Err(MapError::InvalidRange {
                start: u64::MAX,
                len: 2
            })
        );
    }

    #[test]
    fn default_write_bytes_falls_back_to_byte_stores() {
        let mut latch = Latch::default();
        latch.write_bytes(0x40, &[1, 2]).expect("latched");
        assert_eq!(latch.stores, vec![(0x40, 8, 1), (0x41, 8, 2)]);
    }

    #[test]
    fn boxed_devices_forward_to_the_inner_device() {
        let mut boxed: Box<dyn Device> = Box::new(MemoryDevice::new(BASE, 8));
        boxed.store(BASE, 16, 0xBEEF).expect("in bounds");
        assert_eq!(boxed.load(BASE, 16), Ok(0xBEEF));
    }
}
