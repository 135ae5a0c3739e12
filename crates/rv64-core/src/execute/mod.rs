//! Instruction execution pipeline for the RV64I base set plus `mul`.
//!
//! Every call follows the same sequence:
//! 1. Force `x0` to zero
//! 2. Decode all fields of the word
//! 3. Dispatch on opcode, then `funct3`, then `funct7`
//! 4. Perform at most one memory access
//! 5. Write the destination register and/or redirect the PC
//!
//! Faults are precise. A rejected memory access returns before any register
//! write, and an unimplemented encoding leaves the hart untouched apart from
//! the `x0` reset.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]

mod helpers;

pub use helpers::{low32, pc_relative, sext32, sign_extend};

use tracing::{debug, trace};

use crate::decoder::DecodedInstruction;
use crate::encoding::Opcode;
use crate::memory::AccessWidth;
use crate::{DecodeLevel, Device, Fault, Hart};

/// Executes `word` against `hart`, whose PC has already been advanced past
/// the instruction.
///
/// # Errors
///
/// Returns [`Fault::UnimplementedInstruction`] for encodings outside the
/// supported set and propagates bus faults raised by loads and stores.
pub fn execute_instruction<B: Device>(hart: &mut Hart<B>, word: u32) -> Result<(), Fault> {
    hart.registers_mut().clear_zero();

    let inst = DecodedInstruction::decode(word);
    let Some(opcode) = inst.major() else {
        return Err(reject(&inst, DecodeLevel::Opcode));
    };

    match opcode {
        Opcode::Load => execute_load(hart, &inst),
        Opcode::Store => execute_store(hart, &inst),
        Opcode::OpImm => execute_op_imm(hart, &inst),
        Opcode::OpImm32 => execute_op_imm_32(hart, &inst),
        Opcode::Op => execute_op(hart, &inst),
        Opcode::Op32 => execute_op_32(hart, &inst),
        Opcode::Lui => {
            hart.set_reg(inst.rd, inst.imm_u);
            Ok(())
        }
        Opcode::Auipc => {
            hart.set_reg(inst.rd, pc_relative(hart.pc(), inst.imm_u));
            Ok(())
        }
        Opcode::Branch => execute_branch(hart, &inst),
        Opcode::Jal => {
            let link = hart.pc();
            hart.set_reg(inst.rd, link);
            hart.set_pc(pc_relative(link, inst.imm_j));
            Ok(())
        }
        Opcode::Jalr => execute_jalr(hart, &inst),
    }
}

/// Fetches, advances and executes one instruction as a single unit.
///
/// Returns the retired instruction word.
///
/// # Errors
///
/// Propagates fetch faults (PC unchanged) and execute faults (PC already
/// advanced past the faulting instruction).
pub fn step_one<B: Device>(hart: &mut Hart<B>) -> Result<u32, Fault> {
    let pc = hart.pc();
    let word = hart.fetch().inspect_err(|fault| {
        debug!(%fault, "fetch at {pc:#x} faulted");
    })?;
    hart.advance_pc();
    hart.execute(word).inspect_err(|fault| {
        debug!(%fault, "execute of {word:#010x} at {pc:#x} faulted");
    })?;
    trace!("retired {word:#010x} at {pc:#x}, next pc {:#x}", hart.pc());
    Ok(word)
}

const fn reject(inst: &DecodedInstruction, level: DecodeLevel) -> Fault {
    Fault::unimplemented(inst.word, level)
}

fn execute_load<B: Device>(hart: &mut Hart<B>, inst: &DecodedInstruction) -> Result<(), Fault> {
    let (width, signed) = match inst.funct3 {
        0 => (AccessWidth::Byte, true),
        1 => (AccessWidth::Half, true),
        2 => (AccessWidth::Word, true),
        3 => (AccessWidth::Double, false),
        4 => (AccessWidth::Byte, false),
        5 => (AccessWidth::Half, false),
        6 => (AccessWidth::Word, false),
        _ => return Err(reject(inst, DecodeLevel::Funct3)),
    };

    let addr = hart.reg(inst.rs1).wrapping_add(inst.imm_i);
    let raw = hart.bus_mut().load(addr, width.bits())?;
    let value = if signed {
        sign_extend(raw, width.bits())
    } else {
        raw
    };
    hart.set_reg(inst.rd, value);
    Ok(())
}

fn execute_store<B: Device>(hart: &mut Hart<B>, inst: &DecodedInstruction) -> Result<(), Fault> {
    let width = match inst.funct3 {
        0 => AccessWidth::Byte,
        1 => AccessWidth::Half,
        2 => AccessWidth::Word,
        3 => AccessWidth::Double,
        _ => return Err(reject(inst, DecodeLevel::Funct3)),
    };

    let addr = hart.reg(inst.rs1).wrapping_add(inst.imm_s);
    let value = hart.reg(inst.rs2);
    hart.bus_mut().store(addr, width.bits(), value)
}

fn execute_op_imm<B: Device>(hart: &mut Hart<B>, inst: &DecodedInstruction) -> Result<(), Fault> {
    let lhs = hart.reg(inst.rs1);
    let imm = inst.imm_i;
    let shamt = inst.shamt64();

    let value = match inst.funct3 {
        0 => lhs.wrapping_add(imm),
        1 => match inst.funct6() {
            0x00 => lhs << shamt,
            _ => return Err(reject(inst, DecodeLevel::Funct7)),
        },
        2 => u64::from((lhs as i64) < (imm as i64)),
        3 => u64::from(lhs < imm),
        4 => lhs ^ imm,
        5 => match inst.funct6() {
            0x00 => lhs >> shamt,
            0x10 => ((lhs as i64) >> shamt) as u64,
            _ => return Err(reject(inst, DecodeLevel::Funct7)),
        },
        6 => lhs | imm,
        7 => lhs & imm,
        _ => return Err(reject(inst, DecodeLevel::Funct3)),
    };

    hart.set_reg(inst.rd, value);
    Ok(())
}

fn execute_op_imm_32<B: Device>(
    hart: &mut Hart<B>,
    inst: &DecodedInstruction,
) -> Result<(), Fault> {
    let lhs = hart.reg(inst.rs1);
    let shamt = inst.shamt32();

    let value = match inst.funct3 {
        0 => sext32(lhs.wrapping_add(inst.imm_i)),
        1 => match inst.funct7 {
            0x00 => sext32(u64::from(low32(lhs) << shamt)),
            _ => return Err(reject(inst, DecodeLevel::Funct7)),
        },
        5 => match inst.funct7 {
            0x00 => sext32(u64::from(low32(lhs) >> shamt)),
            0x20 => ((low32(lhs) as i32) >> shamt) as i64 as u64,
            _ => return Err(reject(inst, DecodeLevel::Funct7)),
        },
        _ => return Err(reject(inst, DecodeLevel::Funct3)),
    };

    hart.set_reg(inst.rd, value);
    Ok(())
}

fn execute_op<B: Device>(hart: &mut Hart<B>, inst: &DecodedInstruction) -> Result<(), Fault> {
    let lhs = hart.reg(inst.rs1);
    let rhs = hart.reg(inst.rs2);
    let shamt = (rhs & 0x3f) as u32;

    let value = match inst.funct3 {
        0 => match inst.funct7 {
            0x00 => lhs.wrapping_add(rhs),
            0x01 => lhs.wrapping_mul(rhs),
            0x20 => lhs.wrapping_sub(rhs),
            _ => return Err(reject(inst, DecodeLevel::Funct7)),
        },
        5 => match inst.funct7 {
            0x00 => lhs >> shamt,
            0x20 => ((lhs as i64) >> shamt) as u64,
            _ => return Err(reject(inst, DecodeLevel::Funct7)),
        },
        _ if inst.funct7 != 0x00 => return Err(reject(inst, DecodeLevel::Funct7)),
        1 => lhs << shamt,
        2 => u64::from((lhs as i64) < (rhs as i64)),
        3 => u64::from(lhs < rhs),
        4 => lhs ^ rhs,
        6 => lhs | rhs,
        7 => lhs & rhs,
        _ => return Err(reject(inst, DecodeLevel::Funct3)),
    };

    hart.set_reg(inst.rd, value);
    Ok(())
}

fn execute_op_32<B: Device>(hart: &mut Hart<B>, inst: &DecodedInstruction) -> Result<(), Fault> {
    let lhs = low32(hart.reg(inst.rs1));
    let rhs = low32(hart.reg(inst.rs2));
    let shamt = rhs & 0x1f;

    let value = match inst.funct3 {
        0 => match inst.funct7 {
            0x00 => sext32(u64::from(lhs.wrapping_add(rhs))),
            0x20 => sext32(u64::from(lhs.wrapping_sub(rhs))),
            _ => return Err(reject(inst, DecodeLevel::Funct7)),
        },
        1 => match inst.funct7 {
            0x00 => sext32(u64::from(lhs << shamt)),
            _ => return Err(reject(inst, DecodeLevel::Funct7)),
        },
        5 => match inst.funct7 {
            0x00 => sext32(u64::from(lhs >> shamt)),
            0x20 => ((lhs as i32) >> shamt) as i64 as u64,
            _ => return Err(reject(inst, DecodeLevel::Funct7)),
        },
        _ => return Err(reject(inst, DecodeLevel::Funct3)),
    };

    hart.set_reg(inst.rd, value);
    Ok(())
}

fn execute_branch<B: Device>(hart: &mut Hart<B>, inst: &DecodedInstruction) -> Result<(), Fault> {
    let lhs = hart.reg(inst.rs1);
    let rhs = hart.reg(inst.rs2);

    let taken = match inst.funct3 {
        0 => lhs == rhs,
        1 => lhs != rhs,
        4 => (lhs as i64) < (rhs as i64),
        5 => (lhs as i64) >= (rhs as i64),
        6 => lhs < rhs,
        7 => lhs >= rhs,
        _ => return Err(reject(inst, DecodeLevel::Funct3)),
    };

    if taken {
        hart.set_pc(pc_relative(hart.pc(), inst.imm_b));
    }
    Ok(())
}

fn execute_jalr<B: Device>(hart: &mut Hart<B>, inst: &DecodedInstruction) -> Result<(), Fault> {
    if inst.funct3 != 0 {
        return Err(reject(inst, DecodeLevel::Funct3));
    }

    // Target uses rs1 as read before the link write; rd may equal rs1.
    let target = hart.reg(inst.rs1).wrapping_add(inst.imm_i);
    let link = hart.pc();
    hart.set_reg(inst.rd, link);
    hart.set_pc(target);
    Ok(())
}
