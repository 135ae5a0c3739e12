use thiserror::Error;

/// Fault classes used by drivers to decide how to report a stopped hart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FaultClass {
    /// Load or store rejected by the bus or a backing device.
    Memory,
    /// Instruction word has no defined semantics.
    Decode,
}

/// Dispatch level at which an instruction word was rejected.
///
/// Decoding walks `opcode`, then `funct3`, then `funct7`; the level names the
/// first field that did not select a defined operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DecodeLevel {
    /// Major opcode is not part of the supported set.
    Opcode,
    /// Opcode is supported but `funct3` selects nothing.
    Funct3,
    /// Opcode and `funct3` are supported but `funct7` selects nothing.
    Funct7,
}

/// Faults raised by the memory path and the execution engine.
///
/// Every fault is returned synchronously to the immediate caller; none is
/// retried or swallowed inside the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Fault {
    /// Access falls outside every mapped memory window.
    #[error("address {addr:#x} is outside the mapped memory window ({width}-bit access)")]
    OutOfBounds {
        /// First byte address of the rejected access.
        addr: u64,
        /// Access width in bits.
        width: u8,
    },
    /// Access width is not one of 8, 16, 32 or 64 bits.
    #[error("unsupported memory access width of {width} bits")]
    UnsupportedWidth {
        /// Requested width in bits.
        width: u8,
    },
    /// Opcode/funct3/funct7 combination with no defined semantics.
    #[error("unimplemented instruction {word:#010x} (rejected at {level:?})")]
    UnimplementedInstruction {
        /// Raw instruction word.
        word: u32,
        /// Dispatch level that rejected the word.
        level: DecodeLevel,
    },
}

impl Fault {
    /// Returns the reporting class for this fault.
    #[must_use]
    pub const fn class(self) -> FaultClass {
        match self {
            Self::OutOfBounds { .. } | Self::UnsupportedWidth { .. } => FaultClass::Memory,
            Self::UnimplementedInstruction { .. } => FaultClass::Decode,
        }
    }

    pub(crate) const fn unimplemented(word: u32, level: DecodeLevel) -> Self {
        Self::UnimplementedInstruction { word, level }
    }
}

#[cfg(test)]
mod tests {
    use super::{DecodeLevel, Fault, FaultClass};

    #[test]
    fn class_mapping_matches_fault_taxonomy() {
        assert_eq!(
            Fault::OutOfBounds { addr: 0, width: 8 }.class(),
            FaultClass::Memory
        );
        assert_eq!(
            Fault::UnsupportedWidth { width: 12 }.class(),
            FaultClass::Memory
        );
        assert_eq!(
            Fault::unimplemented(0, DecodeLevel::Opcode).class(),
            FaultClass::Decode
        );
    }

    #[test]
    fn display_carries_offending_values() {
        let fault = Fault::OutOfBounds {
            addr: 0x7fff_ffff,
            width: 32,
        };
        assert_eq!(
            fault.to_string(),
            "address 0x7fffffff is outside the mapped memory window (32-bit access)"
        );

        let fault = Fault::unimplemented(0x0000_0000, DecodeLevel::Opcode);
        assert_eq!(
            fault.to_string(),
            "unimplemented instruction 0x00000000 (rejected at Opcode)"
        );
    }
}
