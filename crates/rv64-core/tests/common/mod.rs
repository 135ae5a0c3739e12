//! Instruction encoders and hart fixtures shared by the integration suites.

#![allow(dead_code, clippy::cast_sign_loss)]

use rv64_core::{step_one, Hart, HartConfig};

/// RAM base used by every fixture.
pub const BASE: u64 = 0x8000_0000;
/// Small RAM window so fixtures stay cheap.
pub const CAPACITY: u64 = 0x1_0000;

pub const fn r_type(opcode: u32, funct3: u32, funct7: u32, rd: u32, rs1: u32, rs2: u32) -> u32 {
    (funct7 << 25) | (rs2 << 20) | (rs1 << 15) | (funct3 << 12) | (rd << 7) | opcode
}

pub const fn i_type(opcode: u32, funct3: u32, rd: u32, rs1: u32, imm: i32) -> u32 {
    (((imm as u32) & 0xfff) << 20) | (rs1 << 15) | (funct3 << 12) | (rd << 7) | opcode
}

pub const fn s_type(funct3: u32, rs1: u32, rs2: u32, imm: i32) -> u32 {
    let imm = imm as u32;
    (((imm >> 5) & 0x7f) << 25)
        | (rs2 << 20)
        | (rs1 << 15)
        | (funct3 << 12)
        | ((imm & 0x1f) << 7)
        | 0x23
}

pub const fn b_type(funct3: u32, rs1: u32, rs2: u32, offset: i32) -> u32 {
    let imm = offset as u32;
    (((imm >> 12) & 0x1) << 31)
        | (((imm >> 5) & 0x3f) << 25)
        | (rs2 << 20)
        | (rs1 << 15)
        | (funct3 << 12)
        | (((imm >> 1) & 0xf) << 8)
        | (((imm >> 11) & 0x1) << 7)
        | 0x63
}

pub const fn u_type(opcode: u32, rd: u32, upper: u32) -> u32 {
    (upper << 12) | (rd << 7) | opcode
}

pub const fn j_type(rd: u32, offset: i32) -> u32 {
    let imm = offset as u32;
    (((imm >> 20) & 0x1) << 31)
        | (((imm >> 1) & 0x3ff) << 21)
        | (((imm >> 11) & 0x1) << 20)
        | (((imm >> 12) & 0xff) << 12)
        | (rd << 7)
        | 0x6f
}

pub const fn addi(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(0x13, 0, rd, rs1, imm)
}

pub const fn add(rd: u32, rs1: u32, rs2: u32) -> u32 {
    r_type(0x33, 0, 0x00, rd, rs1, rs2)
}

pub const fn load(funct3: u32, rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(0x03, funct3, rd, rs1, imm)
}

pub const fn store(funct3: u32, rs1: u32, rs2: u32, imm: i32) -> u32 {
    s_type(funct3, rs1, rs2, imm)
}

pub const fn jalr(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(0x67, 0, rd, rs1, imm)
}

/// Little-endian image of `program`.
pub fn image(program: &[u32]) -> Vec<u8> {
    program.iter().flat_map(|word| word.to_le_bytes()).collect()
}

/// Hart with `program` loaded at [`BASE`].
pub fn hart_with(program: &[u32]) -> Hart {
    let mut hart = Hart::new(&HartConfig::new(BASE, CAPACITY)).expect("valid window");
    hart.initialize(&image(program)).expect("image fits");
    hart
}

/// Steps until the PC reaches the end of `program`, failing after `limit`
/// retired instructions.
pub fn run_to_end(hart: &mut Hart, program: &[u32], limit: usize) {
    let end = BASE + 4 * program.len() as u64;
    for _ in 0..limit {
        if hart.pc() == end {
            return;
        }
        step_one(hart).expect("program retires cleanly");
    }
    assert_eq!(hart.pc(), end, "program did not finish within {limit} steps");
}
