//! Field and immediate extraction for 32-bit RV64 instruction words.
//!
//! Every function here is pure. Immediates are returned as 64-bit values
//! already sign-extended from the width their format defines.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]

use crate::encoding::Opcode;
use crate::Register;

/// Major opcode, `word[6:0]`.
#[must_use]
pub const fn opcode(word: u32) -> u8 {
    (word & 0x7f) as u8
}

/// Destination register, `word[11:7]`.
#[must_use]
pub const fn rd(word: u32) -> Register {
    Register::from_u5(word >> 7)
}

/// First source register, `word[19:15]`.
#[must_use]
pub const fn rs1(word: u32) -> Register {
    Register::from_u5(word >> 15)
}

/// Second source register, `word[24:20]`.
#[must_use]
pub const fn rs2(word: u32) -> Register {
    Register::from_u5(word >> 20)
}

/// Minor opcode, `word[14:12]`.
#[must_use]
pub const fn funct3(word: u32) -> u8 {
    ((word >> 12) & 0x7) as u8
}

/// Operation modifier, `word[31:25]`.
#[must_use]
pub const fn funct7(word: u32) -> u8 {
    ((word >> 25) & 0x7f) as u8
}

/// I-type immediate: `word[31:20]` sign-extended from 12 bits.
#[must_use]
pub const fn imm_i(word: u32) -> u64 {
    ((word as i32) >> 20) as i64 as u64
}

/// S-type immediate: `{word[31:25], word[11:7]}` sign-extended from 12 bits.
#[must_use]
pub const fn imm_s(word: u32) -> u64 {
    let upper = ((word as i32) >> 25) << 5;
    let lower = ((word >> 7) & 0x1f) as i32;
    (upper | lower) as i64 as u64
}

/// B-type immediate: `{word[31], word[7], word[30:25], word[11:8], 0}`
/// sign-extended from 13 bits.
#[must_use]
pub const fn imm_b(word: u32) -> u64 {
    let sign = ((word as i32) >> 31) << 12;
    let bit_11 = ((word >> 7) & 0x1) << 11;
    let bits_10_5 = ((word >> 25) & 0x3f) << 5;
    let bits_4_1 = ((word >> 8) & 0xf) << 1;
    (sign | (bit_11 | bits_10_5 | bits_4_1) as i32) as i64 as u64
}

/// U-type immediate: `word[31:12] << 12` sign-extended from 32 bits.
#[must_use]
pub const fn imm_u(word: u32) -> u64 {
    (word & 0xffff_f000) as i32 as i64 as u64
}

/// J-type immediate: `{word[31], word[19:12], word[20], word[30:21], 0}`
/// sign-extended from 21 bits.
#[must_use]
pub const fn imm_j(word: u32) -> u64 {
    let sign = ((word as i32) >> 31) << 20;
    let bits_19_12 = word & 0x000f_f000;
    let bit_11 = ((word >> 20) & 0x1) << 11;
    let bits_10_1 = ((word >> 21) & 0x3ff) << 1;
    (sign | (bits_19_12 | bit_11 | bits_10_1) as i32) as i64 as u64
}

/// Every field of one instruction word, extracted up front.
///
/// Immediates for all formats are decoded regardless of the opcode; only the
/// one matching [`Opcode::format`] is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DecodedInstruction {
    /// Raw instruction word.
    pub word: u32,
    /// Raw 7-bit opcode field.
    pub opcode: u8,
    /// Destination register.
    pub rd: Register,
    /// First source register.
    pub rs1: Register,
    /// Second source register.
    pub rs2: Register,
    /// Minor opcode.
    pub funct3: u8,
    /// Operation modifier.
    pub funct7: u8,
    /// I-type immediate.
    pub imm_i: u64,
    /// S-type immediate.
    pub imm_s: u64,
    /// B-type immediate.
    pub imm_b: u64,
    /// U-type immediate.
    pub imm_u: u64,
    /// J-type immediate.
    pub imm_j: u64,
}

impl DecodedInstruction {
    /// Extracts all fields of `word`.
    #[must_use]
    pub const fn decode(word: u32) -> Self {
        Self {
            word,
            opcode: opcode(word),
            rd: rd(word),
            rs1: rs1(word),
            rs2: rs2(word),
            funct3: funct3(word),
            funct7: funct7(word),
            imm_i: imm_i(word),
            imm_s: imm_s(word),
            imm_b: imm_b(word),
            imm_u: imm_u(word),
            imm_j: imm_j(word),
        }
    }

    /// Classified major opcode, if supported.
    #[must_use]
    pub const fn major(&self) -> Option<Opcode> {
        Opcode::from_bits(self.opcode)
    }

    /// 64-bit shift amount taken from the I-type immediate.
    #[must_use]
    pub const fn shamt64(&self) -> u32 {
        (self.imm_i & 0x3f) as u32
    }

    /// Word-width shift amount taken from the I-type immediate.
    #[must_use]
    pub const fn shamt32(&self) -> u32 {
        (self.imm_i & 0x1f) as u32
    }

    /// Upper six bits of the I-type immediate (`word[31:26]`), which select
    /// between logical and arithmetic 64-bit immediate shifts.
    #[must_use]
    pub const fn funct6(&self) -> u8 {
        self.funct7 >> 1
    }
}
