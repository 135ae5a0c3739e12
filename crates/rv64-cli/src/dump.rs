//! Register dump formatting.

use rv64_core::{ABI_NAMES, GENERAL_REGISTER_COUNT};

/// Registers printed per line.
pub const REGISTERS_PER_LINE: usize = 4;

/// ABI name padded to four columns: two-letter names are centred, longer
/// names right-aligned.
#[must_use]
pub fn padded_abi_name(index: usize) -> String {
    let name = ABI_NAMES[index % GENERAL_REGISTER_COUNT];
    if name.len() == 2 {
        format!(" {name} ")
    } else {
        format!("{name:>4}")
    }
}

/// Renders `registers` as `0x{index:02x} ({name}) = 0x{value:x}` entries,
/// each followed by a tab, [`REGISTERS_PER_LINE`] entries per line.
#[must_use]
pub fn format_registers(registers: &[(u8, u64)]) -> String {
    let mut out = String::new();
    for line in registers.chunks(REGISTERS_PER_LINE) {
        for (index, value) in line {
            let name = padded_abi_name(usize::from(*index));
            out.push_str(&format!("{index:#04x} ({name}) = {value:#x}\t"));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{format_registers, padded_abi_name};

    #[test]
    fn names_pad_to_four_columns() {
        assert_eq!(padded_abi_name(0), "zero");
        assert_eq!(padded_abi_name(1), " ra ");
        assert_eq!(padded_abi_name(26), " s10");
        assert_eq!(padded_abi_name(31), " t6 ");
    }

    #[test]
    fn dump_has_eight_lines_of_four() {
        let mut registers = [(0_u8, 0_u64); 32];
        for (slot, index) in registers.iter_mut().zip(0_u8..) {
            *slot = (index, 0);
        }
        registers[30].1 = 0x2a;
        registers[31].1 = u64::MAX;

        let text = format_registers(&registers);
        assert_eq!(text.lines().count(), 8);
        assert!(text.starts_with("0x00 (zero) = 0x0\t0x01 ( ra ) = 0x0\t"));
        assert!(text.contains("0x1e ( t5 ) = 0x2a\t0x1f ( t6 ) = 0xffffffffffffffff\t\n"));
    }
}
