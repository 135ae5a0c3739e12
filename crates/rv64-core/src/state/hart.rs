use tracing::debug;

use super::registers::{Register, RegisterFile, GENERAL_REGISTER_COUNT};
use crate::bus::{Bus, Device, MapError};
use crate::{execute, Fault, HartConfig};

/// One RV64 hardware thread: integer registers, PC and the bus it owns.
///
/// The PC is advanced by the driver *before* an instruction executes, so
/// while [`Hart::execute`] runs, [`Hart::pc`] already points at the next
/// sequential instruction.
#[derive(Debug)]
pub struct Hart<B = Bus> {
    regs: RegisterFile,
    pc: u64,
    config: HartConfig,
    bus: B,
}

impl Hart<Bus> {
    /// Creates a hart backed by the reference bus: a single zeroed RAM
    /// device covering the configured window.
    ///
    /// # Errors
    ///
    /// Returns [`MapError`] when the configured window is empty or does not
    /// fit the address space.
    pub fn new(config: &HartConfig) -> Result<Self, MapError> {
        let bus = Bus::with_ram(config.memory_base, config.memory_capacity)?;
        Ok(Self::with_bus(config, bus))
    }
}

impl<B: Device> Hart<B> {
    /// Creates a hart over a caller-supplied bus. Registers start at zero and
    /// the PC at the configured base.
    pub const fn with_bus(config: &HartConfig, bus: B) -> Self {
        Self {
            regs: RegisterFile::new(),
            pc: config.memory_base,
            config: *config,
            bus,
        }
    }

    /// Loads `image` at the window base, points `sp` at the top of the
    /// window and resets the PC to the base.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::OutOfBounds`] when the image does not fit the window.
    /// Neither registers nor memory change in that case.
    pub fn initialize(&mut self, image: &[u8]) -> Result<(), Fault> {
        let base = self.config.memory_base;
        self.bus.write_bytes(base, image)?;
        self.regs.write(
            Register::SP,
            base.wrapping_add(self.config.memory_capacity),
        );
        self.pc = base;
        debug!(bytes = image.len(), "loaded image at {base:#x}");
        Ok(())
    }

    /// Reads the 32-bit instruction word at the PC.
    ///
    /// # Errors
    ///
    /// Propagates the bus fault when the PC is not backed by memory.
    #[allow(clippy::cast_possible_truncation)]
    pub fn fetch(&mut self) -> Result<u32, Fault> {
        self.bus.load(self.pc, 32).map(|word| word as u32)
    }

    /// Moves the PC to the next sequential instruction.
    pub const fn advance_pc(&mut self) {
        self.pc = self.pc.wrapping_add(4);
    }

    /// Executes one instruction word against this hart.
    ///
    /// # Errors
    ///
    /// See [`execute::execute_instruction`].
    pub fn execute(&mut self, word: u32) -> Result<(), Fault> {
        execute::execute_instruction(self, word)
    }

    /// Current program counter.
    #[must_use]
    pub const fn pc(&self) -> u64 {
        self.pc
    }

    /// Overwrites the program counter.
    pub const fn set_pc(&mut self, pc: u64) {
        self.pc = pc;
    }

    /// Reads an integer register.
    #[must_use]
    pub const fn reg(&self, reg: Register) -> u64 {
        self.regs.read(reg)
    }

    /// Writes an integer register. A write to `x0` is never observable.
    pub const fn set_reg(&mut self, reg: Register, value: u64) {
        self.regs.write(reg, value);
    }

    /// Read-only view of the register file.
    #[must_use]
    pub const fn registers(&self) -> &RegisterFile {
        &self.regs
    }

    pub(crate) const fn registers_mut(&mut self) -> &mut RegisterFile {
        &mut self.regs
    }

    /// Ordered `(index, value)` pairs for all 32 registers.
    #[must_use]
    pub fn dump_registers(&self) -> [(u8, u64); GENERAL_REGISTER_COUNT] {
        self.regs.dump()
    }

    /// Configuration this hart was built with.
    #[must_use]
    pub const fn config(&self) -> &HartConfig {
        &self.config
    }

    /// Shared access to the bus.
    #[must_use]
    pub const fn bus(&self) -> &B {
        &self.bus
    }

    /// Exclusive access to the bus.
    pub const fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }
}

#[cfg(test)]
mod tests {
    use super::Hart;
    use crate::{Fault, HartConfig, Register};

    const BASE: u64 = 0x8000_0000;

    fn small_hart() -> Hart {
        Hart::new(&HartConfig::new(BASE, 0x1000)).expect("valid window")
    }

    #[test]
    fn initialize_sets_stack_pointer_and_pc() {
        let mut hart = small_hart();
        hart.set_pc(0x1234);
        hart.initialize(&[0x93, 0x02, 0xA0, 0x02]).expect("image fits");
        assert_eq!(hart.pc(), BASE);
        assert_eq!(hart.reg(Register::SP), BASE + 0x1000);
        assert_eq!(hart.fetch(), Ok(0x02A0_0293));
    }

    #[test]
    fn oversized_image_is_rejected_without_side_effects() {
        let mut hart = small_hart();
        hart.set_pc(0x40);
        let image = vec![0xAA; 0x1001];
        assert!(matches!(
            hart.initialize(&image),
            Err(Fault::OutOfBounds { .. })
        ));
        assert_eq!(hart.pc(), 0x40);
        assert_eq!(hart.reg(Register::SP), 0);
    }

    #[test]
    fn fetch_outside_window_faults() {
        let mut hart = small_hart();
        hart.set_pc(BASE + 0x1000);
        assert_eq!(
            hart.fetch(),
            Err(Fault::OutOfBounds {
                addr: BASE + 0x1000,
                width: 32
            })
        );
    }

    #[test]
    fn advance_pc_moves_one_word() {
        let mut hart = small_hart();
        hart.advance_pc();
        assert_eq!(hart.pc(), BASE + 4);
    }

    #[test]
    fn dump_reports_every_register_in_order() {
        let mut hart = small_hart();
        hart.set_reg(Register::from_u5(31), 7);
        let dump = hart.dump_registers();
        assert_eq!(dump.len(), 32);
        assert_eq!(dump[31], (31, 7));
        assert_eq!(dump[0], (0, 0));
    }
}
