/// Instruction encoding formats, named by their immediate layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Format {
    /// Register-register, no immediate.
    R,
    /// 12-bit immediate in `word[31:20]`.
    I,
    /// 12-bit immediate split across `word[31:25]` and `word[11:7]`.
    S,
    /// 13-bit branch offset, bit 0 implicit zero.
    B,
    /// Upper 20 bits in `word[31:12]`.
    U,
    /// 21-bit jump offset, bit 0 implicit zero.
    J,
}

/// Supported major opcodes (`word[6:0]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum Opcode {
    /// `lb`, `lh`, `lw`, `ld`, `lbu`, `lhu`, `lwu`.
    Load = 0x03,
    /// Register-immediate ALU operations.
    OpImm = 0x13,
    /// Add upper immediate to PC.
    Auipc = 0x17,
    /// Word-width register-immediate ALU operations.
    OpImm32 = 0x1b,
    /// `sb`, `sh`, `sw`, `sd`.
    Store = 0x23,
    /// Register-register ALU operations, including `mul`.
    Op = 0x33,
    /// Load upper immediate.
    Lui = 0x37,
    /// Word-width register-register ALU operations.
    Op32 = 0x3b,
    /// Conditional branches.
    Branch = 0x63,
    /// Jump and link register.
    Jalr = 0x67,
    /// Jump and link.
    Jal = 0x6f,
}

/// Single source-of-truth opcode table.
///
/// Any opcode value not present here is unimplemented by definition.
pub const OPCODE_TABLE: &[(u8, Opcode, Format)] = &[
    (0x03, Opcode::Load, Format::I),
    (0x13, Opcode::OpImm, Format::I),
    (0x17, Opcode::Auipc, Format::U),
    (0x1b, Opcode::OpImm32, Format::I),
    (0x23, Opcode::Store, Format::S),
    (0x33, Opcode::Op, Format::R),
    (0x37, Opcode::Lui, Format::U),
    (0x3b, Opcode::Op32, Format::R),
    (0x63, Opcode::Branch, Format::B),
    (0x67, Opcode::Jalr, Format::I),
    (0x6f, Opcode::Jal, Format::J),
];

impl Opcode {
    /// Classifies a 7-bit opcode field.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        let mut index = 0;
        while index < OPCODE_TABLE.len() {
            let (value, opcode, _) = OPCODE_TABLE[index];
            if value == bits {
                return Some(opcode);
            }
            index += 1;
        }
        None
    }

    /// Raw 7-bit opcode value.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Encoding format used by every instruction under this opcode.
    #[must_use]
    pub const fn format(self) -> Format {
        match self {
            Self::Op | Self::Op32 => Format::R,
            Self::Load | Self::OpImm | Self::OpImm32 | Self::Jalr => Format::I,
            Self::Store => Format::S,
            Self::Branch => Format::B,
            Self::Auipc | Self::Lui => Format::U,
            Self::Jal => Format::J,
        }
    }
}

const _: () = assert_opcode_table_consistency();

const fn assert_opcode_table_consistency() {
    let mut index = 0;
    while index < OPCODE_TABLE.len() {
        let (value, opcode, format) = OPCODE_TABLE[index];
        assert!(value == opcode.bits(), "table value must match discriminant");
        assert!(value & 0x03 == 0x03, "32-bit encodings end in 0b11");
        assert!(
            format as u8 == opcode.format() as u8,
            "table format must match Opcode::format"
        );
        index += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{Format, Opcode, OPCODE_TABLE};

    #[test]
    fn every_table_entry_round_trips() {
        for (value, opcode, format) in OPCODE_TABLE {
            assert_eq!(Opcode::from_bits(*value), Some(*opcode));
            assert_eq!(opcode.format(), *format);
        }
    }

    #[test]
    fn unlisted_opcodes_are_unclassified() {
        let listed: Vec<u8> = OPCODE_TABLE.iter().map(|(value, _, _)| *value).collect();
        for bits in 0_u8..0x80 {
            assert_eq!(Opcode::from_bits(bits).is_some(), listed.contains(&bits));
        }
        assert_eq!(Opcode::from_bits(0x00), None);
        assert_eq!(Opcode::from_bits(0x73), None);
    }

    #[test]
    fn formats_follow_the_base_isa() {
        assert_eq!(Opcode::Branch.format(), Format::B);
        assert_eq!(Opcode::Jal.format(), Format::J);
        assert_eq!(Opcode::Store.format(), Format::S);
    }
}
