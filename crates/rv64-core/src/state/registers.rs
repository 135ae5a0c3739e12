/// Number of architectural integer registers (`x0..x31`).
pub const GENERAL_REGISTER_COUNT: usize = 32;

/// Standard ABI mnemonics for `x0..x31`, in index order.
pub const ABI_NAMES: [&str; GENERAL_REGISTER_COUNT] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// Integer register identifier decoded from a 5-bit instruction field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Register(u8);

impl Register {
    /// Hardwired zero register `x0`.
    pub const ZERO: Self = Self(0);
    /// Return address register `x1`.
    pub const RA: Self = Self(1);
    /// Stack pointer register `x2`.
    pub const SP: Self = Self(2);

    /// Returns the register for `index`, if it names one of `x0..x31`.
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < GENERAL_REGISTER_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Extracts a register from the low five bits of `bits`.
    #[must_use]
    pub const fn from_u5(bits: u32) -> Self {
        Self((bits & 0x1f) as u8)
    }

    /// Returns the array index for this register (`0..=31`).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the ABI mnemonic for this register.
    #[must_use]
    pub const fn abi_name(self) -> &'static str {
        ABI_NAMES[self.index()]
    }
}

impl std::fmt::Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// The 32-entry integer register file.
///
/// Writes to `x0` are accepted and stored, but every read path reports it as
/// zero. [`RegisterFile::clear_zero`] also drops the stored value at the start
/// of each execute step.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterFile {
    regs: [u64; GENERAL_REGISTER_COUNT],
}

impl RegisterFile {
    /// All registers zeroed.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            regs: [0; GENERAL_REGISTER_COUNT],
        }
    }

    /// Reads a register. `x0` always reads as zero.
    #[must_use]
    pub const fn read(&self, reg: Register) -> u64 {
        if reg.index() == Register::ZERO.index() {
            0
        } else {
            self.regs[reg.index()]
        }
    }

    /// Writes a register.
    pub const fn write(&mut self, reg: Register, value: u64) {
        self.regs[reg.index()] = value;
    }

    /// Forces `x0` back to zero.
    pub const fn clear_zero(&mut self) {
        self.regs[Register::ZERO.index()] = 0;
    }

    /// Ordered `(index, value)` pairs for every register.
    #[must_use]
    pub fn dump(&self) -> [(u8, u64); GENERAL_REGISTER_COUNT] {
        let mut out = [(0, 0); GENERAL_REGISTER_COUNT];
        for (slot, index) in out.iter_mut().zip(0_u8..) {
            *slot = (index, self.read(Register::from_u5(u32::from(index))));
        }
        out
    }
}
