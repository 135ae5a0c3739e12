//! Operand helpers shared by the instruction families.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]

/// Sign-extends the low `bits` bits of `value` to 64 bits.
#[must_use]
pub const fn sign_extend(value: u64, bits: u8) -> u64 {
    let shift = 64 - bits as u32;
    (((value << shift) as i64) >> shift) as u64
}

/// Sign-extends the low 32 bits of `value`, the result rule for every
/// word-width (`*W`) operation.
#[must_use]
pub const fn sext32(value: u64) -> u64 {
    value as u32 as i32 as i64 as u64
}

/// Low 32 bits of `value` as an unsigned word.
#[must_use]
pub const fn low32(value: u64) -> u32 {
    value as u32
}

/// Resolves a PC-relative target from an already advanced PC.
///
/// The driver moves the PC forward before execution, so the address of the
/// executing instruction is `pc - 4`.
#[must_use]
pub const fn pc_relative(pc: u64, offset: u64) -> u64 {
    pc.wrapping_sub(4).wrapping_add(offset)
}
