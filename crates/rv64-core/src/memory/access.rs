//! Width and window validation for little-endian data accesses.

use crate::Fault;

/// Data access widths supported by the load/store path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum AccessWidth {
    /// 8-bit access.
    Byte = 8,
    /// 16-bit access.
    Half = 16,
    /// 32-bit access.
    Word = 32,
    /// 64-bit access.
    Double = 64,
}

impl AccessWidth {
    /// All supported widths in ascending order.
    pub const ALL: [Self; 4] = [Self::Byte, Self::Half, Self::Word, Self::Double];

    /// Converts a width in bits into an access width.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::UnsupportedWidth`] for anything other than 8, 16, 32
    /// or 64.
    pub const fn from_bits(width: u8) -> Result<Self, Fault> {
        match width {
            8 => Ok(Self::Byte),
            16 => Ok(Self::Half),
            32 => Ok(Self::Word),
            64 => Ok(Self::Double),
            _ => Err(Fault::UnsupportedWidth { width }),
        }
    }

    /// Width in bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Width in bytes.
    #[must_use]
    pub const fn bytes(self) -> usize {
        self as usize / 8
    }

    /// Mask selecting the low `bits()` bits of a 64-bit value.
    #[must_use]
    pub const fn mask(self) -> u64 {
        match self {
            Self::Double => u64::MAX,
            Self::Byte | Self::Half | Self::Word => (1 << self.bits()) - 1,
        }
    }
}

/// Resolves a `len`-byte access at `addr` against the window
/// `[base, base + capacity)` and returns the byte offset into the window.
///
/// # Errors
///
/// Returns [`Fault::OutOfBounds`] when `addr < base` or when any byte of the
/// access would land at or beyond `base + capacity`. Arithmetic never wraps.
pub const fn resolve_window_offset(
    base: u64,
    capacity: u64,
    addr: u64,
    len: u64,
    width: u8,
) -> Result<u64, Fault> {
    let fault = Fault::OutOfBounds { addr, width };
    let Some(offset) = addr.checked_sub(base) else {
        return Err(fault);
    };
    let Some(end) = offset.checked_add(len) else {
        return Err(fault);
    };
    if end > capacity {
        return Err(fault);
    }
    Ok(offset)
}
